use crate::card::{CardIndex, Role, RoleSet};
use crate::game::state::GameState;
use log::trace;

/// Cards a Refill puts into hand when it resolves
pub const REFILL_DRAW: usize = 2;

/// Priority used when nothing else applies
pub const OTHER_PRIORITY: u8 = 9;

/// Lower casts first: Ramp, DrawEngine, Refill, Wincon, then everything else.
/// A card with several roles takes the best one.
pub fn cast_priority(roles: RoleSet) -> u8 {
    if roles.contains(Role::Ramp) {
        1
    } else if roles.contains(Role::DrawEngine) {
        2
    } else if roles.contains(Role::Refill) {
        3
    } else if roles.contains(Role::Wincon) {
        4
    } else {
        OTHER_PRIORITY
    }
}

/// Index of the next spell to cast with `available` mana, if any
fn next_cast(state: &GameState, index: &impl CardIndex, available: u32) -> Option<usize> {
    state
        .hand
        .cards()
        .iter()
        .enumerate()
        .filter(|(_, c)| !index.is_land(c) && index.mana_value(c) <= available)
        .min_by_key(|(i, c)| (cast_priority(index.roles(c)), index.mana_value(c), *i))
        .map(|(i, _)| i)
}

/// Cast spells until nothing affordable is left. Returns unspent mana.
///
/// Ramp adds a permanent mana source; a Refill draws two cards on
/// resolution, which may open up further casts this turn.
pub fn cast_spells(state: &mut GameState, index: &impl CardIndex, mut available: u32) -> u32 {
    while let Some(idx) = next_cast(state, index, available) {
        let Some(card) = state.resolve_spell(idx) else {
            break;
        };
        let cost = index.mana_value(card);
        let roles = index.roles(card);
        available -= cost;
        trace!("turn {}: cast {} ({}) for {}, {} left", state.turn, card, roles, cost, available);

        if roles.contains(Role::Ramp) {
            state.ramp_sources_in_play += 1;
        }
        if roles.contains(Role::Refill) {
            state.refills_resolved += 1;
            state.draw_cards(REFILL_DRAW);
        }
    }
    available
}
