//! Editor configuration loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the
//! stock editor defaults.
//!
//! ```toml
//! [board]
//! piece_theme = "img/chesspieces/alpha/{piece}.svg"
//! orientation = "black"
//!
//! [loader]
//! normalize_trailing_char = true
//!
//! [parser]
//! tolerant = false
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::editor::board_widget::BoardConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub board: BoardConfig,
    pub loader: LoaderConfig,
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Overwrite the last character of pasted FEN with `1` before loading.
    pub normalize_trailing_char: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept sloppy SAN and coordinate moves in edited movetext.
    pub tolerant: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { tolerant: true }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
