use crate::card::{CardIndex, Role};
use crate::game::state::GameState;
use log::trace;

/// Start a new turn: increment turn counter
pub fn start_turn(state: &mut GameState) {
    state.turn += 1;
}

/// Draw step: one card off the top (the player draws on turn 1 in multiplayer)
pub fn draw_step(state: &mut GameState) -> bool {
    state.draw_card()
}

/// Land drop: the first land in hand order goes to the battlefield
pub fn land_drop(state: &mut GameState, index: &impl CardIndex) -> bool {
    match state.hand.position(|c| index.is_land(c)) {
        Some(idx) => {
            if let Some(land) = state.hand.cards().get(idx) {
                trace!("turn {}: land drop {}", state.turn, land);
            }
            state.play_land(idx)
        }
        None => false,
    }
}

/// Latch the engine flag once a draw engine is in play, then take the
/// engine's extra draw. Returns true if a card was drawn.
pub fn engine_draw(state: &mut GameState, index: &impl CardIndex) -> bool {
    if !state.engine_online && state.battlefield_has_role(index, Role::DrawEngine) {
        trace!("turn {}: draw engine online", state.turn);
        state.engine_online = true;
    }
    state.engine_online && state.draw_card()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardDatabase, CardProfile};

    fn db() -> CardDatabase {
        [
            CardProfile::land("Forest"),
            CardProfile::land("Island"),
            CardProfile::spell("Phyrexian Arena", 3, &[Role::DrawEngine]),
            CardProfile::spell("Bear", 2, &[]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_start_turn_increments_turn() {
        let mut state = GameState::new();
        start_turn(&mut state);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_draw_step_on_empty_library() {
        let mut state = GameState::new();
        assert!(!draw_step(&mut state));
        assert!(state.hand.is_empty());
    }

    #[test]
    fn test_land_drop_takes_first_land_only() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Bear", "Island", "Forest"], vec![]);
        assert!(land_drop(&mut state, &db));
        assert_eq!(state.lands_in_play, 1);
        assert!(state.battlefield.contains("Island"));
        assert_eq!(state.hand.cards(), &["Bear", "Forest"]);
    }

    #[test]
    fn test_land_drop_without_land() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Bear"], vec![]);
        assert!(!land_drop(&mut state, &db));
        assert_eq!(state.lands_in_play, 0);
    }

    #[test]
    fn test_engine_draw_latches() {
        let db = db();
        let mut state = GameState::with_opening(vec![], vec!["Bear", "Forest"]);
        assert!(!engine_draw(&mut state, &db));
        assert!(!state.engine_online);

        state.battlefield.add("Phyrexian Arena");
        assert!(engine_draw(&mut state, &db));
        assert!(state.engine_online);
        assert_eq!(state.hand.cards(), &["Bear"]);

        // Stays latched even with the library running dry
        assert!(engine_draw(&mut state, &db));
        assert!(!engine_draw(&mut state, &db));
        assert!(state.engine_online);
    }
}
