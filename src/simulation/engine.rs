use crate::card::{CardIndex, Role};
use crate::game::state::GameState;
use crate::game::turns::{draw_step, engine_draw, land_drop, start_turn};
use crate::rng::GameRng;
use crate::simulation::casting::cast_spells;
use crate::simulation::config::SimGoals;
use crate::simulation::mulligan::london_mulligan;
use crate::simulation::outcome::{damage_this_turn, has_wincon_resolved};
use log::trace;
use serde::Serialize;

/// How a trial was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WinMethod {
    /// An alternate win condition resolved
    Wincon,
    /// Cumulative damage reached the threshold
    Damage,
}

/// Result of a single trial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrialResult {
    /// Card-draw advantage was in place on the draw-goal turn
    pub draw_goal_met: bool,
    /// Turn on which the trial was first won (None if no win by the last turn)
    pub won_on_turn: Option<u32>,
    pub win_method: Option<WinMethod>,
    pub mulligans: u32,
    pub cumulative_damage: u32,
}

/// Draw, land drop, engine draw and casting for one turn.
/// Returns the mana that was available for the turn.
pub fn execute_turn(state: &mut GameState, index: &impl CardIndex) -> u32 {
    start_turn(state);
    draw_step(state);
    land_drop(state, index);
    engine_draw(state, index);

    let available = state.available_mana();
    cast_spells(state, index, available);

    trace!(
        "turn {}: {} mana, hand {}, battlefield {}, library {}",
        state.turn,
        available,
        state.hand.size(),
        state.battlefield.size(),
        state.library.size()
    );
    available
}

/// Card-draw advantage: an engine online, a refill already resolved, or a
/// refill in hand that could be cast right now.
pub fn draw_goal_met(state: &GameState, index: &impl CardIndex) -> bool {
    let mana = state.available_mana();
    state.engine_online
        || state.refills_resolved > 0
        || state
            .hand
            .cards()
            .iter()
            .any(|c| index.roles(c).contains(Role::Refill) && index.mana_value(c) <= mana)
}

/// End-of-turn win checks: a resolved wincon first, then this turn's damage
pub fn check_win(state: &mut GameState, index: &impl CardIndex, goals: &SimGoals) -> Option<WinMethod> {
    if has_wincon_resolved(state, index) {
        return Some(WinMethod::Wincon);
    }

    let damage = damage_this_turn(state, index);
    state.cumulative_damage += damage;
    if state.cumulative_damage >= goals.damage_threshold {
        return Some(WinMethod::Damage);
    }
    None
}

/// Play turns 1..=win_by_turn from a settled opening hand
pub fn play_game(state: &mut GameState, index: &impl CardIndex, goals: &SimGoals) -> TrialResult {
    let mut result = TrialResult::default();

    while state.turn < goals.win_by_turn {
        execute_turn(state, index);

        if state.turn == goals.draw_by_turn && draw_goal_met(state, index) {
            result.draw_goal_met = true;
        }

        if let Some(method) = check_win(state, index, goals) {
            trace!("won on turn {} by {:?}", state.turn, method);
            result.won_on_turn = Some(state.turn);
            result.win_method = Some(method);
            break;
        }
    }

    result.cumulative_damage = state.cumulative_damage;
    result
}

/// Run one complete trial: mulligan, then play out the turns
pub fn run_trial(
    pool: &[&str],
    index: &impl CardIndex,
    goals: &SimGoals,
    max_mulligans: u32,
    rng: &mut GameRng,
) -> TrialResult {
    let opening = london_mulligan(pool, index, rng, max_mulligans);
    let mulligans = opening.mulligans;

    let mut state = GameState::with_opening(opening.hand, opening.library);
    let mut result = play_game(&mut state, index, goals);
    result.mulligans = mulligans;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardDatabase, CardProfile};

    fn db() -> CardDatabase {
        [
            CardProfile::land("Forest"),
            CardProfile::spell("Sol Ring", 1, &[Role::Ramp]),
            CardProfile::spell("Phyrexian Arena", 3, &[Role::DrawEngine]),
            CardProfile::spell("Windfall", 3, &[Role::Refill]),
            CardProfile::spell("Oracle", 0, &[Role::Wincon]),
            CardProfile::spell("Titan", 2, &[Role::Damage]),
            CardProfile::spell("Bear", 2, &[]),
        ]
        .into_iter()
        .collect()
    }

    fn goals(draw_by_turn: u32, win_by_turn: u32, damage_threshold: u32) -> SimGoals {
        SimGoals {
            draw_by_turn,
            win_by_turn,
            damage_threshold,
        }
    }

    #[test]
    fn test_execute_turn_order() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Bear", "Forest"], vec!["Forest", "Sol Ring"]);
        let mana = execute_turn(&mut state, &db);
        assert_eq!(state.turn, 1);
        assert_eq!(mana, 1);
        // Drew a Forest and played the first one; Bear costs 2
        assert_eq!(state.lands_in_play, 1);
        assert_eq!(state.hand.cards(), &["Bear", "Forest"]);

        let mana = execute_turn(&mut state, &db);
        assert_eq!(mana, 2);
        // Drew Sol Ring; Ramp goes first, then Bear does not fit in the 1 left
        assert!(state.battlefield.contains("Sol Ring"));
        assert_eq!(state.ramp_sources_in_play, 1);
        assert_eq!(state.hand.cards(), &["Bear"]);
    }

    #[test]
    fn test_no_op_trial_ends_quietly() {
        let db = db();
        let mut state = GameState::with_opening(vec![], vec![]);
        let result = play_game(&mut state, &db, &goals(5, 8, 120));
        assert_eq!(state.turn, 8);
        assert_eq!(result.won_on_turn, None);
        assert_eq!(result.cumulative_damage, 0);
        assert!(!result.draw_goal_met);
    }

    #[test]
    fn test_wincon_wins_immediately() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Oracle"], vec![]);
        let result = play_game(&mut state, &db, &goals(5, 8, 120));
        assert_eq!(result.won_on_turn, Some(1));
        assert_eq!(result.win_method, Some(WinMethod::Wincon));
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_damage_accumulates_to_threshold() {
        let db = db();
        // Titan cast turn 2: 4 nominal -> 2 through per turn, turns 2..=4 -> 6
        let mut state = GameState::with_opening(vec!["Forest", "Forest", "Titan"], vec![]);
        let result = play_game(&mut state, &db, &goals(5, 8, 6));
        assert_eq!(result.won_on_turn, Some(4));
        assert_eq!(result.win_method, Some(WinMethod::Damage));
        assert_eq!(result.cumulative_damage, 6);
    }

    #[test]
    fn test_draw_goal_via_engine() {
        let db = db();
        let mut state = GameState::with_opening(
            vec!["Forest", "Forest", "Forest", "Phyrexian Arena"],
            vec!["Bear", "Bear", "Bear", "Bear", "Bear", "Bear"],
        );
        // Arena resolves on turn 3 and the engine latches at the start of turn 4
        let result = play_game(&mut state, &db, &goals(4, 5, 120));
        assert!(result.draw_goal_met);
        assert!(state.engine_online);
        assert_eq!(result.won_on_turn, None);
    }

    #[test]
    fn test_draw_goal_via_refill() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Forest", "Forest", "Forest"], vec![]);
        state.hand.add_card("Windfall");
        // Turn 2: only two lands, Windfall stays in hand and is not yet castable
        assert!(!play_game(&mut state, &db, &goals(2, 2, 120)).draw_goal_met);

        let mut state = GameState::with_opening(vec!["Forest", "Forest", "Forest", "Windfall"], vec![]);
        // Turn 3 casts it, so the goal is met through the resolved refill
        let result = play_game(&mut state, &db, &goals(3, 3, 120));
        assert!(result.draw_goal_met);
        assert_eq!(state.refills_resolved, 1);
    }

    #[test]
    fn test_draw_goal_check_helper() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Windfall"], vec![]);
        assert!(!draw_goal_met(&state, &db));
        state.lands_in_play = 3;
        assert!(draw_goal_met(&state, &db));
    }

    #[test]
    fn test_draw_goal_after_game_ends_is_missed() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Oracle", "Phyrexian Arena"], vec![]);
        let result = play_game(&mut state, &db, &goals(3, 8, 120));
        assert_eq!(result.won_on_turn, Some(1));
        assert!(!result.draw_goal_met);
    }

    #[test]
    fn test_zero_turn_goal_plays_nothing() {
        let db = db();
        let mut state = GameState::with_opening(vec!["Oracle"], vec![]);
        let result = play_game(&mut state, &db, &goals(0, 0, 120));
        assert_eq!(state.turn, 0);
        assert_eq!(result, TrialResult::default());
    }

    #[test]
    fn test_run_trial_records_mulligans() {
        let db = db();
        let pool: Vec<&str> = vec!["Forest"; 99];
        let mut rng = GameRng::new(Some(11));
        let result = run_trial(&pool, &db, &goals(5, 8, 120), 2, &mut rng);
        assert_eq!(result.mulligans, 2);
        assert_eq!(result.won_on_turn, None);
        assert_eq!(result.cumulative_damage, 0);
    }
}
