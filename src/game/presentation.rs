//! Side-effect sink the controller draws through.

use crate::deck::{Card, GridLayout};
use crate::timer::AlertTier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Game,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardFace {
    Down,
    Up,
    Matched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Tick,
}

pub trait Presentation {
    /// Viewport size in CSS pixels, read once per level load.
    fn viewport(&self) -> (f64, f64);
    fn show_screen(&mut self, screen: Screen);
    fn show_level(&mut self, level: u32);
    fn show_time(&mut self, seconds: i32);
    /// Replace any previous hinge class with the one for `tier`.
    fn set_alert(&mut self, tier: AlertTier);
    fn set_pulse(&mut self, on: bool);
    /// Clear the board and draw `cards` face down, row-major.
    fn render_grid(&mut self, layout: &GridLayout, cards: &[Card]);
    fn set_card_face(&mut self, index: usize, face: CardFace);
    fn show_level_banner(&mut self, visible: bool);
    fn play_cue(&mut self, cue: Cue);
}
