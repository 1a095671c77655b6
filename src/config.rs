//! Tunable game parameters.
//!
//! Defaults reproduce the classic pacing: one minute per level, a three second
//! preview and a one second pause after a wrong pair. The browser page may
//! override any subset through `configure()` with a JSON object.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Emoji set the deck draws its pairs from. 32 symbols cover levels 1..=6.
pub const SYMBOLS: &[&str] = &[
    "😊", "😢", "😡", "😱", "😍", "😎", "😭", "😴",
    "😜", "🤔", "😇", "🤐", "😷", "🤒", "🤕", "😈",
    "👻", "💩", "😺", "🙈", "🐵", "🐶", "🐱", "🐯",
    "🦁", "🐮", "🐸", "🐼", "🐰", "🐷", "🐔", "🐧",
];

/// Placeholder filling the last slot of an odd-sized grid.
pub const FILLER: &str = "❓";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Countdown length of every level, in seconds.
    pub time_limit_secs: i32,
    /// Tier 1 warning (pulse + tick cue) at or below this many seconds.
    pub warning_secs: i32,
    /// Tier 2 warning at or below this many seconds.
    pub critical_secs: i32,
    pub preview_ms: u32,
    pub mismatch_ms: u32,
    pub level_up_ms: u32,
    pub game_over_ms: u32,
    /// Countdown and tick-cue period.
    pub tick_ms: u32,
    pub card_min_px: u32,
    pub grid_padding_px: u32,
    /// Vertical space kept free for the header and timer.
    pub header_reserve_px: u32,
    pub symbols: Vec<String>,
    pub filler: String,
    /// Fixed RNG seed; `None` seeds from the platform entropy source.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 60,
            warning_secs: 15,
            critical_secs: 5,
            preview_ms: 3000,
            mismatch_ms: 1000,
            level_up_ms: 1500,
            game_over_ms: 1500,
            tick_ms: 1000,
            card_min_px: 32,
            grid_padding_px: 20,
            header_reserve_px: 200,
            symbols: SYMBOLS.iter().map(|s| s.to_string()).collect(),
            filler: FILLER.to_string(),
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON object and validate the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_limit_secs <= 0 {
            return Err(GameError::InvalidConfig(
                "time_limit_secs must be positive".into(),
            ));
        }
        if self.critical_secs > self.warning_secs {
            return Err(GameError::InvalidConfig(format!(
                "critical_secs ({}) exceeds warning_secs ({})",
                self.critical_secs, self.warning_secs
            )));
        }
        if self.tick_ms == 0 {
            return Err(GameError::InvalidConfig("tick_ms must be non-zero".into()));
        }
        if self.symbols.is_empty() {
            return Err(GameError::InvalidConfig("symbol set is empty".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for s in &self.symbols {
            if !seen.insert(s.as_str()) {
                return Err(GameError::InvalidConfig(format!("duplicate symbol '{s}'")));
            }
            if *s == self.filler {
                return Err(GameError::InvalidConfig(format!(
                    "filler '{s}' also appears in the symbol set"
                )));
            }
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| GameError::InvalidConfig(format!("unknown log level '{}'", self.log_level)))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, secs: i32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = symbols.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.symbols.len(), 32);
        assert_eq!(cfg.tracing_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "time_limit_secs": 30, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.time_limit_secs, 30);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.preview_ms, 3000);
        assert_eq!(cfg.filler, FILLER);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = GameConfig::from_json(r#"{ "warning_secs": 4, "critical_secs": 9 }"#);
        assert!(matches!(err, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let cfg = GameConfig::default().with_symbols(&["🐶", "🐱", "🐶"]);
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_json_and_log_level() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(GameError::ConfigJson(_))
        ));
        assert!(GameConfig::from_json(r#"{ "log_level": "chatty" }"#).is_err());
    }
}
