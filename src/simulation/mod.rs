pub mod aggregate;
pub mod casting;
pub mod config;
pub mod deck;
pub mod engine;
pub mod mulligan;
pub mod outcome;

pub use aggregate::{run_simulation, run_simulation_with_progress, AggregateResult, TrialTally};
pub use config::{ConfigError, SimConfig, SimGoals, SimSettings};
pub use deck::{parse_deck_file, parse_deck_text, Deck, DeckError};
pub use engine::{run_trial, TrialResult, WinMethod};
pub use mulligan::{london_mulligan, MulliganOutcome};
