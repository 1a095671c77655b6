//! Error type for setup and configuration failures.
//!
//! Gameplay itself never fails: ignored clicks are silent and running out of
//! time is an ordinary transition. Only the browser glue, config parsing and
//! deck construction can produce a [`GameError`].

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("symbol pool holds {available} distinct symbols, level {level} needs {needed}")]
    SymbolPoolExhausted {
        level: u32,
        needed: usize,
        available: usize,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config json: {0}")]
    ConfigJson(#[from] serde_json::Error),
    #[error("dom: {0}")]
    Js(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
