//! Game controller: level loading, pair matching, countdown and transitions.
//!
//! The controller is a plain state machine. Drawing goes through a
//! [`Presentation`] and every delay through a [`Scheduler`], so the same code
//! runs in the browser and under `cargo test` with a virtual clock.
//!
//! Selection phases inside a level:
//! - Idle: no card face up
//! - OneSelected: first card of a pair face up
//! - Evaluating: board locked while a mismatched pair waits to turn back
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};

use crate::config::GameConfig;
use crate::deck::{Card, Deck, GridLayout};
use crate::error::Result;
use crate::schedule::{Scheduler, Task, TaskId, VirtualScheduler};
use crate::timer::{self, AlertTier, Thresholds};

mod presentation;

pub use presentation::{CardFace, Cue, Presentation, Screen};

// --- State ------------------------------------------------------------------

/// Per-level counters. Reset on every level load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub level: u32,
    pub time_left: i32,
    pub matched_count: usize,
    /// Cards that must be matched to clear the level (always even).
    pub total_cards: usize,
    pub locked: bool,
}

impl GameState {
    fn new() -> Self {
        Self { level: 1, time_left: 0, matched_count: 0, total_cards: 0, locked: true }
    }
}

/// Indices of the face-up, unmatched cards of the current pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub first: Option<usize>,
    pub second: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    OneSelected,
    Evaluating,
}

impl Selection {
    pub fn phase(&self) -> SelectionPhase {
        match (self.first, self.second) {
            (None, _) => SelectionPhase::Idle,
            (Some(_), None) => SelectionPhase::OneSelected,
            (Some(_), Some(_)) => SelectionPhase::Evaluating,
        }
    }

    fn clear(&mut self) {
        *self = Selection::default();
    }
}

/// Where the controller is in the welcome / level / game-over cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Welcome,
    Preview,
    Playing,
    LevelUp,
    TimedOut,
    GameOver,
}

// --- Controller -------------------------------------------------------------

pub struct Controller<P, S> {
    config: GameConfig,
    thresholds: Thresholds,
    state: GameState,
    selection: Selection,
    cards: Vec<Card>,
    grid_size: u32,
    stage: Stage,
    countdown: Option<TaskId>,
    tick_cue: Option<TaskId>,
    rng: ChaCha8Rng,
    presentation: P,
    scheduler: S,
}

impl<P: Presentation, S: Scheduler> Controller<P, S> {
    pub fn new(config: GameConfig, presentation: P, scheduler: S) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let thresholds = Thresholds { warning: config.warning_secs, critical: config.critical_secs };
        Ok(Self {
            config,
            thresholds,
            state: GameState::new(),
            selection: Selection::default(),
            cards: Vec::new(),
            grid_size: 0,
            stage: Stage::Welcome,
            countdown: None,
            tick_cue: None,
            rng,
            presentation,
            scheduler,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Leave the welcome screen and start at level 1.
    pub fn start(&mut self) {
        if self.stage != Stage::Welcome {
            debug!(stage = ?self.stage, "start ignored");
            return;
        }
        self.begin();
    }

    /// Start over at level 1 from the welcome or game-over screen.
    pub fn restart(&mut self) {
        if !matches!(self.stage, Stage::Welcome | Stage::GameOver) {
            debug!(stage = ?self.stage, "restart ignored");
            return;
        }
        self.begin();
    }

    /// Drop any level in progress and show the welcome screen with an empty
    /// board. Used when the page swaps in a freshly configured game.
    pub fn reset(&mut self) {
        self.stop_countdown();
        self.scheduler.cancel_all();
        self.selection.clear();
        self.cards.clear();
        self.grid_size = 0;
        self.state = GameState::new();
        self.stage = Stage::Welcome;
        self.presentation.show_level_banner(false);
        self.presentation.set_alert(AlertTier::Calm);
        self.presentation.set_pulse(false);
        let layout = GridLayout::fit(
            0,
            self.presentation.viewport(),
            self.config.grid_padding_px,
            self.config.header_reserve_px,
            self.config.card_min_px,
        );
        self.presentation.render_grid(&layout, &self.cards);
        self.presentation.show_screen(Screen::Welcome);
    }

    fn begin(&mut self) {
        self.presentation.show_screen(Screen::Game);
        self.state.level = 1;
        self.load_level();
    }

    /// Host timer callback for a handle previously handed to the scheduler.
    pub fn fire(&mut self, id: TaskId) {
        if let Some(task) = self.scheduler.take_due(id) {
            self.run(task);
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::EndPreview => self.end_preview(),
            Task::HideMismatch => self.hide_mismatch(),
            Task::FinishLevelUp => self.finish_level_up(),
            Task::ShowGameOver => self.game_over(),
            Task::CountdownTick => self.countdown_tick(),
            Task::TickCue => self.presentation.play_cue(Cue::Tick),
        }
    }

    // --- Level loader -------------------------------------------------------

    fn load_level(&mut self) {
        // Anything still pending belongs to the previous level.
        self.scheduler.cancel_all();
        self.countdown = None;
        self.tick_cue = None;
        self.selection.clear();

        let level = self.state.level;
        let deck = match Deck::build(level, &self.config.symbols, &self.config.filler, &mut self.rng) {
            Ok(deck) => deck,
            Err(err) => {
                error!(level, %err, "cannot build deck");
                self.game_over();
                return;
            }
        };

        self.grid_size = deck.grid_size;
        self.cards = deck.cards;
        self.state.matched_count = 0;
        self.state.total_cards = deck.playable;
        self.state.locked = true;
        self.stage = Stage::Preview;
        info!(level, grid = self.grid_size, cards = self.state.total_cards, "level loaded");

        self.presentation.set_alert(AlertTier::Calm);
        self.presentation.show_level(level);
        let layout = GridLayout::fit(
            self.grid_size,
            self.presentation.viewport(),
            self.config.grid_padding_px,
            self.config.header_reserve_px,
            self.config.card_min_px,
        );
        self.presentation.render_grid(&layout, &self.cards);

        self.state.time_left = self.config.time_limit_secs;
        self.countdown_tick();
        if self.stage == Stage::Preview {
            self.countdown = Some(
                self.scheduler.schedule_repeating(Task::CountdownTick, self.config.tick_ms),
            );
        }

        for (i, card) in self.cards.iter().enumerate() {
            if !card.filler {
                self.presentation.set_card_face(i, CardFace::Up);
            }
        }
        self.scheduler.schedule(Task::EndPreview, self.config.preview_ms);
    }

    fn end_preview(&mut self) {
        for (i, card) in self.cards.iter().enumerate() {
            if !card.filler && !card.matched {
                self.presentation.set_card_face(i, CardFace::Down);
            }
        }
        if self.stage == Stage::Preview {
            self.stage = Stage::Playing;
            self.state.locked = false;
        }
    }

    // --- Selection & matching -----------------------------------------------

    /// Card click from the presentation layer.
    pub fn activate(&mut self, index: usize) {
        if self.state.locked {
            debug!(index, "activation ignored: board locked");
            return;
        }
        let Some(card) = self.cards.get_mut(index) else {
            debug!(index, "activation ignored: no such card");
            return;
        };
        if card.is_resolved() {
            debug!(index, "activation ignored: card resolved");
            return;
        }
        card.flipped = true;
        self.presentation.set_card_face(index, CardFace::Up);

        let Some(first) = self.selection.first else {
            self.selection.first = Some(index);
            return;
        };
        self.selection.second = Some(index);
        self.state.locked = true;

        if self.cards[first].symbol == self.cards[index].symbol {
            for i in [first, index] {
                self.cards[i].matched = true;
                self.presentation.set_card_face(i, CardFace::Matched);
            }
            self.state.matched_count += 2;
            self.selection.clear();
            self.state.locked = false;
            debug!(matched = self.state.matched_count, total = self.state.total_cards, "pair matched");
            if self.state.matched_count == self.state.total_cards {
                self.complete_level();
            }
        } else {
            self.scheduler.schedule(Task::HideMismatch, self.config.mismatch_ms);
        }
    }

    fn hide_mismatch(&mut self) {
        for i in [self.selection.first, self.selection.second].into_iter().flatten() {
            if let Some(card) = self.cards.get_mut(i) {
                card.flipped = false;
                self.presentation.set_card_face(i, CardFace::Down);
            }
        }
        self.selection.clear();
        if self.stage == Stage::Playing {
            self.state.locked = false;
        }
    }

    // --- Countdown ----------------------------------------------------------

    fn countdown_tick(&mut self) {
        let tick = timer::step(&mut self.state.time_left, &self.thresholds);
        self.presentation.show_time(tick.shown);
        self.presentation.set_alert(tick.tier);

        if tick.tier == AlertTier::Expired {
            if let Some(id) = self.countdown.take() {
                self.scheduler.cancel(id);
            }
            self.state.locked = true;
            self.stage = Stage::TimedOut;
            info!(level = self.state.level, "time is up");
            self.scheduler.schedule(Task::ShowGameOver, self.config.game_over_ms);
            return;
        }

        self.presentation.set_pulse(tick.tier.pulses());
        if tick.tier.pulses() {
            if self.tick_cue.is_none() {
                self.tick_cue =
                    Some(self.scheduler.schedule_repeating(Task::TickCue, self.config.tick_ms));
            }
        } else {
            self.stop_tick_cue();
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
        self.stop_tick_cue();
    }

    fn stop_tick_cue(&mut self) {
        if let Some(id) = self.tick_cue.take() {
            self.scheduler.cancel(id);
        }
    }

    // --- Transitions --------------------------------------------------------

    fn complete_level(&mut self) {
        self.stop_countdown();
        self.presentation.set_pulse(false);
        self.state.locked = true;
        self.stage = Stage::LevelUp;
        info!(level = self.state.level, time_left = self.state.time_left, "level complete");
        self.presentation.show_level_banner(true);
        self.scheduler.schedule(Task::FinishLevelUp, self.config.level_up_ms);
    }

    fn finish_level_up(&mut self) {
        self.presentation.show_level_banner(false);
        self.state.level += 1;
        self.load_level();
    }

    fn game_over(&mut self) {
        self.stop_countdown();
        self.scheduler.cancel_all();
        self.state.locked = true;
        self.selection.clear();
        self.stage = Stage::GameOver;
        info!(level = self.state.level, "game over");
        self.presentation.set_pulse(false);
        self.presentation.show_screen(Screen::GameOver);
    }
}

impl<P: Presentation> Controller<P, VirtualScheduler> {
    /// Move the virtual clock forward, firing every task that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some((due, id)) = self.scheduler.next_due(until) {
            self.scheduler.set_now(due);
            self.fire(id);
        }
        self.scheduler.set_now(until);
    }
}
