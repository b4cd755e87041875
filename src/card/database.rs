use crate::card::index::CardIndex;
use crate::card::roles::{infer_roles, roles_from_tag};
use crate::card::types::{CardFacts, CardProfile, Role, RoleSet};
use crate::simulation::deck::Deck;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardDatabaseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid card data: {0}")]
    InvalidCard(String),
}

/// One face of a multi-faced card record
#[derive(Debug, Default, Deserialize)]
struct CardFaceRecord {
    #[serde(default)]
    type_line: Option<String>,
    #[serde(default)]
    oracle_text: Option<String>,
    #[serde(default)]
    power: Option<serde_json::Value>,
}

/// Card record as stored on disk (a subset of the Scryfall card object,
/// plus optional tags and explicit roles)
#[derive(Debug, Deserialize)]
struct CardRecord {
    #[serde(default)]
    name: String,
    #[serde(default, alias = "cmc")]
    mana_value: Option<f64>,
    #[serde(default)]
    type_line: Option<String>,
    #[serde(default)]
    oracle_text: Option<String>,
    #[serde(default)]
    power: Option<serde_json::Value>,
    #[serde(default)]
    card_faces: Vec<CardFaceRecord>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    roles: Vec<Role>,
}

/// Power is "4", 4, or "*" depending on the source
fn coerce_power(value: &Option<serde_json::Value>) -> Option<i32> {
    match value.as_ref()? {
        serde_json::Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Join a text field across the record and its faces, top-level value first
fn join_face_field<'a>(top: &'a Option<String>, faces: impl Iterator<Item = &'a Option<String>>) -> String {
    let mut vals: Vec<&str> = faces.filter_map(non_empty).collect();
    if let Some(t) = non_empty(top) {
        if !vals.contains(&t) {
            vals.insert(0, t);
        }
    }
    vals.join("\n//\n")
}

impl CardRecord {
    fn into_profile(self) -> Result<CardProfile, CardDatabaseError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CardDatabaseError::InvalidCard("card record without a name".to_string()));
        }

        let mana_value = match self.mana_value {
            Some(mv) if mv.is_finite() && mv > 0.0 => mv.ceil() as u32,
            Some(mv) if mv.is_finite() => 0,
            Some(mv) => {
                return Err(CardDatabaseError::InvalidCard(format!("{}: mana value {}", name, mv)));
            }
            None => 0,
        };

        let type_line = join_face_field(&self.type_line, self.card_faces.iter().map(|f| &f.type_line));
        let oracle_text = join_face_field(&self.oracle_text, self.card_faces.iter().map(|f| &f.oracle_text));
        let power = self
            .card_faces
            .iter()
            .find_map(|f| coerce_power(&f.power))
            .or_else(|| coerce_power(&self.power));

        let mut facts = CardFacts::from_type_line(name, &type_line, mana_value);
        facts.oracle_text = oracle_text;
        facts.power = power;

        let mut roles = infer_roles(&facts).union(self.roles.into_iter().collect());
        let mut profile = CardProfile::new(facts, RoleSet::new());
        for tag in self.tags {
            roles = roles.union(roles_from_tag(&tag));
            let tag = tag.trim();
            if !tag.is_empty() {
                profile.tags.insert(tag.to_string());
            }
        }
        profile.roles = roles;
        Ok(profile)
    }
}

/// Card database that loads card facts from JSON and derives roles
#[derive(Debug, Default, Clone)]
pub struct CardDatabase {
    cards: HashMap<String, CardProfile>,
}

impl CardDatabase {
    pub fn new() -> Self {
        CardDatabase::default()
    }

    /// Load cards from a JSON file
    pub fn from_file(path: &str) -> Result<Self, CardDatabaseError> {
        let content = std::fs::read_to_string(path)?;
        let db = Self::from_json_str(&content)?;
        debug!("loaded {} cards from {}", db.card_count(), path);
        Ok(db)
    }

    /// Parse a JSON array of card records
    pub fn from_json_str(content: &str) -> Result<Self, CardDatabaseError> {
        let records: Vec<CardRecord> = serde_json::from_str(content)?;
        let mut db = CardDatabase::new();
        for record in records {
            db.insert(record.into_profile()?);
        }
        Ok(db)
    }

    /// Add or replace a card
    pub fn insert(&mut self, profile: CardProfile) {
        self.cards.insert(profile.name().to_string(), profile);
    }

    /// Merge the deck's inline annotations into the matching cards:
    /// the raw tag is kept and any role it names is added.
    pub fn apply_inline_tags(&mut self, deck: &Deck) {
        for (name, tags) in deck.inline_tags() {
            let Some(profile) = self.cards.get_mut(name) else {
                if !tags.is_empty() {
                    warn!("tags {:?} on unknown card '{}' ignored", tags, name);
                }
                continue;
            };
            for tag in tags {
                profile.roles = profile.roles.union(roles_from_tag(tag));
                profile.tags.insert(tag.clone());
            }
        }
    }

    /// Names the deck uses that this database cannot resolve
    pub fn missing_from<'d>(&self, deck: &'d Deck) -> Vec<&'d str> {
        deck.counts()
            .keys()
            .map(String::as_str)
            .filter(|name| !self.cards.contains_key(*name))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&CardProfile> {
        self.cards.get(name)
    }

    /// Get total number of cards
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

impl CardIndex for CardDatabase {
    fn profile(&self, name: &str) -> Option<&CardProfile> {
        self.cards.get(name)
    }
}

impl FromIterator<CardProfile> for CardDatabase {
    fn from_iter<I: IntoIterator<Item = CardProfile>>(iter: I) -> Self {
        let mut db = CardDatabase::new();
        for profile in iter {
            db.insert(profile);
        }
        db
    }
}
