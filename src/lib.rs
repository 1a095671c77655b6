//! Emoji Pairs core crate.
//!
//! A timed memory-matching game: every level deals a square grid of face-down
//! emoji pairs, shows them for a short preview, then the player has one
//! minute to match them all. Clearing a grid deals the next, one row and
//! column larger.
//!
//! The game rules live in [`game::Controller`], which only talks to the page
//! through the [`game::Presentation`] and [`schedule::Scheduler`] traits. The
//! `web` module binds those to the DOM and `setTimeout`; everything else runs
//! natively under `cargo test`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod schedule;
pub mod timer;
pub mod web;

pub use config::{FILLER, GameConfig, SYMBOLS};
pub use error::GameError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Page entrypoints (wired to the welcome / game-over buttons)
// -----------------------------------------------------------------------------

/// Override the default settings with a JSON object, e.g.
/// `configure('{"time_limit_secs": 90}')`. Replaces any running game.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::install(config)?;
    Ok(())
}

#[wasm_bindgen(js_name = startGame)]
pub fn start_game() -> Result<(), JsValue> {
    web::start()?;
    Ok(())
}

#[wasm_bindgen(js_name = restartGame)]
pub fn restart_game() -> Result<(), JsValue> {
    web::restart()?;
    Ok(())
}
