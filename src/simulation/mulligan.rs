use crate::card::CardIndex;
use crate::rng::GameRng;
use log::trace;

pub const OPENING_HAND_SIZE: usize = 7;

/// Where the mulligan procedure stands after looking at a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    /// Hand rejected; shuffle again for attempt `k`
    Attempting(u32),
    /// Hand passed the keep rule
    Kept,
    /// Out of mulligans, hand accepted as is
    ForcedKeep,
}

/// Settled opening hand and the library it leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulliganOutcome<'a> {
    pub hand: Vec<&'a str>,
    /// Draw order; bottomed cards sit at the end
    pub library: Vec<&'a str>,
    pub mulligans: u32,
    pub forced: bool,
}

/// Count the number of lands in a hand
fn count_lands(hand: &[&str], index: &impl CardIndex) -> usize {
    hand.iter().filter(|c| index.is_land(c)).count()
}

/// Keep hands with 2-5 lands and at least one spell
pub fn is_keepable(hand: &[&str], index: &impl CardIndex) -> bool {
    let lands = count_lands(hand, index);
    (2..=5).contains(&lands) && hand.iter().any(|c| !index.is_land(c))
}

/// Pick the card to put on the bottom: a land while the hand holds more
/// than 3, otherwise the most expensive spell (first one on ties).
fn choose_bottom(hand: &[&str], index: &impl CardIndex) -> Option<usize> {
    if count_lands(hand, index) > 3 {
        return hand.iter().position(|c| index.is_land(c));
    }

    let mut worst: Option<(usize, u32)> = None;
    for (i, card) in hand.iter().enumerate() {
        if index.is_land(card) {
            continue;
        }
        let mv = index.mana_value(card);
        if worst.map_or(true, |(_, best)| mv > best) {
            worst = Some((i, mv));
        }
    }

    // All lands and three or fewer of them: bottom a land anyway
    worst.map(|(i, _)| i).or(if hand.is_empty() { None } else { Some(0) })
}

/// London mulligan: draw 7 from a fresh shuffle of the whole pool, up to
/// `max_mulligans` times, then bottom one card per mulligan taken.
///
/// Always returns within `max_mulligans + 1` shuffles; the last attempt is
/// kept whatever it looks like.
pub fn london_mulligan<'a>(
    pool: &[&'a str],
    index: &impl CardIndex,
    rng: &mut GameRng,
    max_mulligans: u32,
) -> MulliganOutcome<'a> {
    let mut attempt = 0;
    loop {
        let mut cards = pool.to_vec();
        rng.shuffle(&mut cards);
        let library = cards.split_off(OPENING_HAND_SIZE.min(cards.len()));
        let hand = cards;

        let decision = if is_keepable(&hand, index) {
            KeepDecision::Kept
        } else if attempt >= max_mulligans {
            KeepDecision::ForcedKeep
        } else {
            KeepDecision::Attempting(attempt + 1)
        };
        trace!("mulligan attempt {}: {:?}", attempt, decision);

        match decision {
            KeepDecision::Attempting(next) => attempt = next,
            KeepDecision::Kept | KeepDecision::ForcedKeep => {
                return bottom_cards(hand, library, attempt, decision == KeepDecision::ForcedKeep, index);
            }
        }
    }
}

/// Put one card per mulligan on the bottom of the library. The cards stay
/// in the library (drawable late in a long game) instead of leaving the
/// game, so hand plus library always covers the whole pool.
fn bottom_cards<'a>(
    mut hand: Vec<&'a str>,
    mut library: Vec<&'a str>,
    mulligans: u32,
    forced: bool,
    index: &impl CardIndex,
) -> MulliganOutcome<'a> {
    for _ in 0..mulligans {
        let Some(idx) = choose_bottom(&hand, index) else {
            break;
        };
        library.push(hand.remove(idx));
    }

    MulliganOutcome {
        hand,
        library,
        mulligans,
        forced,
    }
}
