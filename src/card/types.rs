use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Strategic role of a card. Closed vocabulary; a card may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Ramp,
    DrawEngine,
    Refill,
    Wincon,
    Damage,
    Evasion,
    ExtraCombat,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Ramp,
        Role::DrawEngine,
        Role::Refill,
        Role::Wincon,
        Role::Damage,
        Role::Evasion,
        Role::ExtraCombat,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ramp => "Ramp",
            Role::DrawEngine => "DrawEngine",
            Role::Refill => "Refill",
            Role::Wincon => "Wincon",
            Role::Damage => "Damage",
            Role::Evasion => "Evasion",
            Role::ExtraCombat => "ExtraCombat",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of roles packed into a single byte (no allocations on lookup)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub fn new() -> Self {
        RoleSet(0)
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn with(mut self, role: Role) -> Self {
        self.insert(role);
        self
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn union(self, other: RoleSet) -> RoleSet {
        RoleSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Gameplay facts about a card, as resolved from the card database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFacts {
    pub name: String,
    pub mana_value: u32,
    pub type_line: String,
    pub oracle_text: String,
    pub is_land: bool,
    pub is_creature: bool,
    pub is_artifact: bool,
    pub is_enchantment: bool,
    pub is_instant: bool,
    pub is_sorcery: bool,
    pub power: Option<i32>,
}

impl CardFacts {
    /// Facts derived from a type line alone
    pub fn from_type_line(name: &str, type_line: &str, mana_value: u32) -> Self {
        let has = |needle: &str| type_line.to_lowercase().contains(needle);
        CardFacts {
            name: name.to_string(),
            mana_value,
            type_line: type_line.to_string(),
            oracle_text: String::new(),
            is_land: has("land"),
            is_creature: has("creature"),
            is_artifact: has("artifact"),
            is_enchantment: has("enchantment"),
            is_instant: has("instant"),
            is_sorcery: has("sorcery"),
            power: None,
        }
    }
}

/// Everything the simulation may ask about one card name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardProfile {
    pub facts: CardFacts,
    pub roles: RoleSet,
    /// Raw annotations, passed through untouched for diagnostics
    pub tags: BTreeSet<String>,
}

impl CardProfile {
    pub fn new(facts: CardFacts, roles: RoleSet) -> Self {
        CardProfile {
            facts,
            roles,
            tags: BTreeSet::new(),
        }
    }

    /// A land with no roles
    pub fn land(name: &str) -> Self {
        CardProfile::new(CardFacts::from_type_line(name, "Basic Land", 0), RoleSet::new())
    }

    /// A non-land spell with the given cost and roles
    pub fn spell(name: &str, mana_value: u32, roles: &[Role]) -> Self {
        CardProfile::new(
            CardFacts::from_type_line(name, "Artifact", mana_value),
            roles.iter().copied().collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.facts.name
    }
}
