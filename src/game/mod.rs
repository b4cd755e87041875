pub mod state;
pub mod turns;
pub mod zones;

pub use state::GameState;
pub use zones::{Battlefield, Hand, Library};
