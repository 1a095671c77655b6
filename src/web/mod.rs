//! Browser glue: the single controller instance, DOM callbacks and timers.

use std::cell::RefCell;

use tracing::warn;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::Controller;
use crate::schedule::TaskId;

mod dom;
mod logging;
mod scheduler;

pub use dom::DomPresentation;
pub use scheduler::BrowserScheduler;

pub type BrowserGame = Controller<DomPresentation, BrowserScheduler>;

thread_local! {
    static GAME: RefCell<Option<BrowserGame>> = const { RefCell::new(None) };
}

/// Build the controller against the current page, replacing any previous one.
pub fn install(config: GameConfig) -> Result<()> {
    logging::init(config.tracing_level()?);
    let window = web_sys::window().ok_or(GameError::NoWindow)?;
    let presentation = DomPresentation::attach(window.clone())?;
    let mut game = Controller::new(config, presentation, BrowserScheduler::new(window))?;
    // Empties #grid, detaching the previous game's cards before their click
    // closures are dropped with it.
    game.reset();
    // Dropping the previous game clears its pending timeouts.
    GAME.with(|cell| cell.replace(Some(game)));
    Ok(())
}

fn installed() -> bool {
    GAME.with(|cell| cell.try_borrow().map(|g| g.is_some()).unwrap_or(true))
}

fn with_game(f: impl FnOnce(&mut BrowserGame)) {
    GAME.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(game) = slot.as_mut() {
                f(game);
            }
        }
        Err(_) => warn!("game busy, event dropped"),
    });
}

pub fn start() -> Result<()> {
    if !installed() {
        install(GameConfig::default())?;
    }
    with_game(|g| g.start());
    Ok(())
}

pub fn restart() -> Result<()> {
    if !installed() {
        install(GameConfig::default())?;
    }
    with_game(|g| g.restart());
    Ok(())
}

pub(crate) fn activate(index: usize) {
    with_game(|g| g.activate(index));
}

pub(crate) fn fire(id: TaskId) {
    with_game(|g| g.fire(id));
}
