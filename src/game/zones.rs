use std::collections::{BTreeSet, VecDeque};

/// Library - shuffled once, then drawn strictly from the front
#[derive(Debug, Clone, Default)]
pub struct Library<'a> {
    cards: VecDeque<&'a str>,
}

impl<'a> Library<'a> {
    pub fn new() -> Self {
        Library { cards: VecDeque::new() }
    }

    pub fn from_cards(cards: Vec<&'a str>) -> Self {
        Library { cards: cards.into() }
    }

    pub fn add_card(&mut self, card: &'a str) {
        self.cards.push_back(card);
    }

    pub fn draw(&mut self) -> Option<&'a str> {
        self.cards.pop_front()
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.cards.iter().copied()
    }
}

/// Hand - cards in hand, in the order they arrived
#[derive(Debug, Clone, Default)]
pub struct Hand<'a> {
    cards: Vec<&'a str>,
}

impl<'a> Hand<'a> {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<&'a str>) -> Self {
        Hand { cards }
    }

    pub fn add_card(&mut self, card: &'a str) {
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, index: usize) -> Option<&'a str> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Index of the first card matching `pred`, in hand order
    pub fn position(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.cards.iter().position(|c| pred(*c))
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[&'a str] {
        &self.cards
    }
}

/// Battlefield - the set of card names in play.
///
/// Two copies of the same name count once: role queries see names, not
/// objects.
#[derive(Debug, Clone, Default)]
pub struct Battlefield<'a> {
    names: BTreeSet<&'a str>,
}

impl<'a> Battlefield<'a> {
    pub fn new() -> Self {
        Battlefield { names: BTreeSet::new() }
    }

    /// Returns false when a card of that name was already in play
    pub fn add(&mut self, card: &'a str) -> bool {
        self.names.insert(card)
    }

    pub fn contains(&self, card: &str) -> bool {
        self.names.contains(card)
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.names.iter().copied()
    }
}
