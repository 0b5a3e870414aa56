use std::env;

use serde::{Deserialize, Serialize};

use self::gemini::GeminiConfig;
use self::storage::StorageConfig;
use self::ui::UiConfig;

pub mod gemini;
pub mod storage;
pub mod ui;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Build config from process environment, falling back to defaults
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            gemini: GeminiConfig::from_lookup(&lookup),
            storage: StorageConfig::from_lookup(&lookup),
            ui: UiConfig::from_lookup(&lookup),
        }
    }
}
