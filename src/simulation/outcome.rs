//! Damage and win-condition scoring for the current battlefield.

use crate::card::{CardIndex, Role};
use crate::game::state::GameState;

/// Nominal damage per threat per turn
pub const DAMAGE_PER_THREAT: u32 = 4;
/// Percent of nominal damage that connects with and without evasion
pub const EVASIVE_THROUGH_PCT: u32 = 85;
pub const GROUNDED_THROUGH_PCT: u32 = 60;
/// Percent of the running total each extra combat adds
pub const EXTRA_COMBAT_PCT: u32 = 70;

/// Conservative, deck-agnostic estimate of this turn's damage.
///
/// Each ExtraCombat permanent adds 70% of the running total, so several of
/// them compound.
pub fn damage_this_turn(state: &GameState, index: &impl CardIndex) -> u32 {
    let threats = state.battlefield_role_count(index, Role::Damage);
    let nominal = DAMAGE_PER_THREAT * threats;

    let through_pct = if state.battlefield_has_role(index, Role::Evasion) {
        EVASIVE_THROUGH_PCT
    } else {
        GROUNDED_THROUGH_PCT
    };
    let mut through = nominal * through_pct / 100;

    for _ in 0..state.battlefield_role_count(index, Role::ExtraCombat) {
        through += through * EXTRA_COMBAT_PCT / 100;
    }

    through
}

/// True once any alternate win condition is on the battlefield
pub fn has_wincon_resolved(state: &GameState, index: &impl CardIndex) -> bool {
    state.battlefield_has_role(index, Role::Wincon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardDatabase, CardProfile};

    fn db() -> CardDatabase {
        [
            CardProfile::spell("Ogre", 3, &[Role::Damage]),
            CardProfile::spell("Troll", 3, &[Role::Damage]),
            CardProfile::spell("Giant", 5, &[Role::Damage]),
            CardProfile::spell("Drake", 4, &[Role::Damage, Role::Evasion]),
            CardProfile::spell("Relentless Assault", 4, &[Role::ExtraCombat]),
            CardProfile::spell("Aggravated Assault", 3, &[Role::ExtraCombat]),
            CardProfile::spell("Lab Man", 3, &[Role::Wincon]),
        ]
        .into_iter()
        .collect()
    }

    fn board<'a>(cards: &[&'a str]) -> GameState<'a> {
        let mut state = GameState::new();
        for &card in cards {
            state.battlefield.add(card);
        }
        state
    }

    #[test]
    fn test_empty_board_deals_nothing() {
        assert_eq!(damage_this_turn(&GameState::new(), &db()), 0);
    }

    #[test]
    fn test_grounded_threats() {
        // 3 threats: 12 nominal, 60% -> 7
        assert_eq!(damage_this_turn(&board(&["Ogre", "Troll", "Giant"]), &db()), 7);
    }

    #[test]
    fn test_evasion_raises_through() {
        // 2 threats: 8 nominal, 85% -> 6
        assert_eq!(damage_this_turn(&board(&["Ogre", "Drake"]), &db()), 6);
    }

    #[test]
    fn test_extra_combats_compound() {
        // 4 threats with evasion: 16 nominal -> 13, +9 -> 22, +15 -> 37
        let state = board(&["Ogre", "Troll", "Giant", "Drake", "Relentless Assault", "Aggravated Assault"]);
        assert_eq!(damage_this_turn(&state, &db()), 37);

        let single = board(&["Ogre", "Troll", "Giant", "Drake", "Relentless Assault"]);
        assert_eq!(damage_this_turn(&single, &db()), 22);
    }

    #[test]
    fn test_extra_combat_without_threats() {
        assert_eq!(damage_this_turn(&board(&["Relentless Assault"]), &db()), 0);
    }

    #[test]
    fn test_duplicate_names_count_once() {
        assert_eq!(damage_this_turn(&board(&["Ogre", "Ogre"]), &db()), 2);
    }

    #[test]
    fn test_wincon_detection() {
        let db = db();
        assert!(!has_wincon_resolved(&board(&["Ogre"]), &db));
        assert!(has_wincon_resolved(&board(&["Ogre", "Lab Man"]), &db));
    }
}
