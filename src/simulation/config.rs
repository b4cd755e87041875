use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of mulligans allowed before a hand is force-kept
pub const DEFAULT_MAX_MULLIGANS: u32 = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// What a trial is trying to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimGoals {
    /// Turn on which card-draw advantage is checked
    pub draw_by_turn: u32,
    /// Last turn simulated; a win must happen on or before it
    pub win_by_turn: u32,
    /// Cumulative damage that counts as a win (three opponents at 40 life)
    pub damage_threshold: u32,
}

impl Default for SimGoals {
    fn default() -> Self {
        SimGoals {
            draw_by_turn: 5,
            win_by_turn: 8,
            damage_threshold: 120,
        }
    }
}

/// How a run is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub trials: usize,
    /// Fixed seed for reproducible runs; random when absent
    pub seed: Option<u64>,
    pub max_mulligans: u32,
    /// Spread trials over the rayon pool, one sub-seeded RNG per trial
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            trials: 100_000,
            seed: None,
            max_mulligans: DEFAULT_MAX_MULLIGANS,
            parallel: false,
        }
    }
}

/// Goals and config together, as read from a settings file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub goals: SimGoals,
    pub config: SimConfig,
}

impl SimSettings {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
