//! Deck construction: grid sizing, pair sampling and shuffling.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{GameError, Result};

/// Side length of the square grid for `level` (3x3, 4x4, 5x5...).
pub fn grid_size(level: u32) -> u32 {
    level + 2
}

/// Number of playable cards for `level`: the grid area rounded down to even.
pub fn playable_cards(level: u32) -> usize {
    let g = grid_size(level) as usize;
    let area = g * g;
    area - area % 2
}

/// One card on the board. Its identity is its index in [`Deck::cards`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub symbol: String,
    pub flipped: bool,
    pub matched: bool,
    /// Placeholder for odd grids; never flips, never matches.
    pub filler: bool,
}

impl Card {
    fn new(symbol: String, filler: bool) -> Self {
        Self { symbol, flipped: false, matched: false, filler }
    }

    /// True when the card can no longer be activated.
    pub fn is_resolved(&self) -> bool {
        self.filler || self.flipped || self.matched
    }
}

#[derive(Clone, Debug)]
pub struct Deck {
    pub grid_size: u32,
    pub cards: Vec<Card>,
    /// Cards that must be matched to clear the level (filler excluded).
    pub playable: usize,
}

impl Deck {
    /// Build a shuffled deck for `level`.
    ///
    /// Picks `playable / 2` distinct symbols by drawing at random and skipping
    /// repeats, doubles them, appends `filler` when the grid area is odd and
    /// shuffles the whole sequence.
    pub fn build<R: Rng + ?Sized>(
        level: u32,
        symbols: &[String],
        filler: &str,
        rng: &mut R,
    ) -> Result<Deck> {
        let g = grid_size(level);
        let area = (g * g) as usize;
        let playable = playable_cards(level);
        let pairs = playable / 2;

        let distinct = {
            let mut uniq: Vec<&String> = symbols.iter().collect();
            uniq.sort();
            uniq.dedup();
            uniq.len()
        };
        if distinct < pairs {
            return Err(GameError::SymbolPoolExhausted {
                level,
                needed: pairs,
                available: distinct,
            });
        }

        let mut picked: Vec<&String> = Vec::with_capacity(pairs);
        while picked.len() < pairs {
            let candidate = &symbols[rng.gen_range(0..symbols.len())];
            if !picked.contains(&candidate) {
                picked.push(candidate);
            }
        }

        let mut cards: Vec<Card> = picked
            .iter()
            .chain(picked.iter())
            .map(|s| Card::new((*s).clone(), false))
            .collect();
        if area % 2 != 0 {
            cards.push(Card::new(filler.to_string(), true));
        }
        cards.shuffle(rng);

        Ok(Deck { grid_size: g, cards, playable })
    }
}

/// Pixel geometry of one level's grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub size: u32,
    pub card_px: u32,
    pub glyph_px: f64,
}

impl GridLayout {
    /// Fit `size` x `size` square cards into the viewport, keeping a side
    /// padding and a reserved header band, never shrinking below `min_px`.
    pub fn fit(
        size: u32,
        viewport: (f64, f64),
        padding_px: u32,
        header_px: u32,
        min_px: u32,
    ) -> GridLayout {
        let (width, height) = viewport;
        let avail_w = width - padding_px as f64 * 2.0;
        let avail_h = height - header_px as f64;
        let fitted = (avail_w / size as f64).min(avail_h / size as f64).floor();
        let card_px = if fitted.is_finite() && fitted > min_px as f64 {
            fitted as u32
        } else {
            min_px
        };
        GridLayout {
            size,
            card_px,
            glyph_px: card_px as f64 * 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FILLER, GameConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn counts(deck: &Deck) -> HashMap<&str, usize> {
        let mut m = HashMap::new();
        for c in &deck.cards {
            *m.entry(c.symbol.as_str()).or_insert(0) += 1;
        }
        m
    }

    #[test]
    fn grid_dimensions_per_level() {
        assert_eq!(grid_size(1), 3);
        assert_eq!(playable_cards(1), 8);
        assert_eq!(playable_cards(2), 16);
        assert_eq!(playable_cards(3), 24);
        assert_eq!(playable_cards(6), 64);
    }

    #[test]
    fn every_level_the_pool_supports_pairs_up() {
        let cfg = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for level in 1..=6 {
            let deck = Deck::build(level, &cfg.symbols, FILLER, &mut rng).unwrap();
            let g = grid_size(level) as usize;
            assert_eq!(deck.cards.len(), g * g);
            assert_eq!(deck.playable, playable_cards(level));
            for (sym, n) in counts(&deck) {
                if sym == FILLER {
                    assert_eq!(n, 1);
                    assert!(g * g % 2 == 1);
                } else {
                    assert_eq!(n, 2, "symbol {sym} on level {level}");
                }
            }
            let fillers = deck.cards.iter().filter(|c| c.filler).count();
            assert_eq!(fillers, g * g % 2);
        }
    }

    #[test]
    fn pool_too_small_is_reported() {
        let cfg = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = Deck::build(7, &cfg.symbols, FILLER, &mut rng).unwrap_err();
        match err {
            GameError::SymbolPoolExhausted { level, needed, available } => {
                assert_eq!((level, needed, available), (7, 40, 32));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn same_seed_same_deck() {
        let cfg = GameConfig::default();
        let a = Deck::build(3, &cfg.symbols, FILLER, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let b = Deck::build(3, &cfg.symbols, FILLER, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn layout_fits_viewport_and_clamps() {
        let l = GridLayout::fit(3, (1040.0, 800.0), 20, 200, 32);
        assert_eq!(l.card_px, 200);
        assert!((l.glyph_px - 120.0).abs() < 1e-9);

        let tiny = GridLayout::fit(8, (200.0, 240.0), 20, 200, 32);
        assert_eq!(tiny.card_px, 32);
    }
}
