use crate::card::{CardIndex, Role};
use crate::game::zones::{Battlefield, Hand, Library};

/// Complete state of one trial
#[derive(Debug, Clone, Default)]
pub struct GameState<'a> {
    // Zones
    pub library: Library<'a>,
    pub hand: Hand<'a>,
    pub battlefield: Battlefield<'a>,

    // Game info
    pub turn: u32,

    // Mana
    pub lands_in_play: u32,
    /// Ramp permanents cast so far; each is one extra mana every turn
    pub ramp_sources_in_play: u32,

    // Bookkeeping
    pub refills_resolved: u32,
    pub cumulative_damage: u32,
    /// Latched once a draw engine hits the battlefield; never resets
    pub engine_online: bool,
}

impl<'a> GameState<'a> {
    pub fn new() -> Self {
        GameState::default()
    }

    /// State at the start of turn 1 after the opening hand is settled
    pub fn with_opening(hand: Vec<&'a str>, library: Vec<&'a str>) -> Self {
        GameState {
            hand: Hand::from_cards(hand),
            library: Library::from_cards(library),
            ..GameState::default()
        }
    }

    /// Draw a card from the library to hand
    pub fn draw_card(&mut self) -> bool {
        if let Some(card) = self.library.draw() {
            self.hand.add_card(card);
            true
        } else {
            false
        }
    }

    /// Draw up to `count` cards, stopping early on an empty library
    pub fn draw_cards(&mut self, count: usize) -> usize {
        (0..count).take_while(|_| self.draw_card()).count()
    }

    /// Play a land from hand to battlefield
    pub fn play_land(&mut self, card_index: usize) -> bool {
        if let Some(card) = self.hand.remove_card(card_index) {
            self.battlefield.add(card);
            self.lands_in_play += 1;
            true
        } else {
            false
        }
    }

    /// Move a spell from hand to battlefield
    pub fn resolve_spell(&mut self, card_index: usize) -> Option<&'a str> {
        let card = self.hand.remove_card(card_index)?;
        self.battlefield.add(card);
        Some(card)
    }

    /// Flat mana model: every land and every ramp source gives one
    pub fn available_mana(&self) -> u32 {
        self.lands_in_play + self.ramp_sources_in_play
    }

    /// Whether any card on the battlefield carries `role`
    pub fn battlefield_has_role(&self, index: &impl CardIndex, role: Role) -> bool {
        self.battlefield.cards().any(|c| index.roles(c).contains(role))
    }

    /// Number of battlefield cards carrying `role`
    pub fn battlefield_role_count(&self, index: &impl CardIndex, role: Role) -> u32 {
        self.battlefield.cards().filter(|c| index.roles(c).contains(role)).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardDatabase, CardProfile};

    #[test]
    fn test_game_state_creation() {
        let state = GameState::new();
        assert_eq!(state.turn, 0);
        assert_eq!(state.available_mana(), 0);
        assert!(!state.engine_online);
        assert!(state.hand.is_empty());
    }

    #[test]
    fn test_draw_card() {
        let mut state = GameState::with_opening(vec![], vec!["Sol Ring"]);
        assert!(state.draw_card());
        assert_eq!(state.hand.size(), 1);
        assert!(!state.draw_card());
    }

    #[test]
    fn test_draw_cards_stops_at_empty_library() {
        let mut state = GameState::with_opening(vec![], vec!["A"]);
        assert_eq!(state.draw_cards(2), 1);
        assert_eq!(state.hand.cards(), &["A"]);
    }

    #[test]
    fn test_play_land_counts_every_land() {
        let mut state = GameState::with_opening(vec!["Forest", "Forest"], vec![]);
        assert!(state.play_land(0));
        assert!(state.play_land(0));
        assert_eq!(state.lands_in_play, 2);
        assert_eq!(state.battlefield.size(), 1);
        assert!(!state.play_land(0));
    }

    #[test]
    fn test_battlefield_role_queries() {
        let db: CardDatabase = [
            CardProfile::spell("Ogre", 3, &[Role::Damage]),
            CardProfile::spell("Troll", 3, &[Role::Damage]),
        ]
        .into_iter()
        .collect();

        let mut state = GameState::with_opening(vec!["Ogre", "Troll"], vec![]);
        assert!(!state.battlefield_has_role(&db, Role::Damage));
        state.resolve_spell(0);
        state.resolve_spell(0);
        assert!(state.battlefield_has_role(&db, Role::Damage));
        assert_eq!(state.battlefield_role_count(&db, Role::Damage), 2);
        assert_eq!(state.battlefield_role_count(&db, Role::Evasion), 0);
    }
}
