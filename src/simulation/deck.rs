use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Total cards in a Commander deck, commanders included
pub const DECK_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid deck format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Deck size != 100 (got {0})")]
    WrongSize(u64),
    #[error("Expected 1 or 2 commanders, got {0}")]
    CommanderCount(usize),
    #[error("Commander '{0}' not found in counts")]
    UnknownCommander(String),
    #[error("Library size != {expected} (got {got})")]
    LibrarySize { expected: usize, got: usize },
}

/// A validated 100-card deck: commander(s) plus the library they lead.
///
/// Immutable once built; every trial borrows card names from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    name: String,
    library: Vec<String>,
    commanders: Vec<String>,
    counts: BTreeMap<String, u32>,
    inline_tags: BTreeMap<String, BTreeSet<String>>,
}

impl Deck {
    /// Build a deck from card counts (commander copies included) and
    /// validate it.
    pub fn new(
        name: &str,
        counts: BTreeMap<String, u32>,
        commanders: Vec<String>,
        inline_tags: BTreeMap<String, BTreeSet<String>>,
    ) -> Result<Self, DeckError> {
        let total = total_cards(&counts);
        if total != u64::from(DECK_SIZE) {
            return Err(DeckError::WrongSize(total));
        }
        if !(1..=2).contains(&commanders.len()) {
            return Err(DeckError::CommanderCount(commanders.len()));
        }

        // Library = counts minus one copy per commander
        let mut lib_counts = counts.clone();
        for commander in &commanders {
            let remaining = lib_counts
                .get_mut(commander)
                .filter(|n| **n > 0)
                .ok_or_else(|| DeckError::UnknownCommander(commander.clone()))?;
            *remaining -= 1;
            if *remaining == 0 {
                lib_counts.remove(commander);
            }
        }

        let library: Vec<String> = lib_counts
            .iter()
            .flat_map(|(name, qty)| std::iter::repeat(name.clone()).take(*qty as usize))
            .collect();

        let expected = DECK_SIZE as usize - commanders.len();
        if library.len() != expected {
            return Err(DeckError::LibrarySize { expected, got: library.len() });
        }

        let deck = Deck {
            name: name.to_string(),
            library,
            commanders,
            counts,
            inline_tags,
        };
        debug_assert!(deck.check_invariants());
        Ok(deck)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cards that can be drawn (commanders excluded)
    pub fn library(&self) -> &[String] {
        &self.library
    }

    pub fn commanders(&self) -> &[String] {
        &self.commanders
    }

    pub fn counts(&self) -> &BTreeMap<String, u32> {
        &self.counts
    }

    pub fn inline_tags(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.inline_tags
    }

    /// Re-check the construction invariants
    pub fn check_invariants(&self) -> bool {
        total_cards(&self.counts) == u64::from(DECK_SIZE)
            && (1..=2).contains(&self.commanders.len())
            && self.library.len() == DECK_SIZE as usize - self.commanders.len()
            && self
                .commanders
                .iter()
                .all(|c| self.counts.get(c).map_or(false, |n| *n >= 1))
    }
}

/// Sum of all copies, widened so absurd quantities cannot overflow
fn total_cards(counts: &BTreeMap<String, u32>) -> u64 {
    counts.values().map(|n| u64::from(*n)).sum()
}

/// "N Card Name" with N all digits
fn split_quantity(line: &str) -> Option<(&str, &str)> {
    let (qty, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if qty.is_empty() || !qty.chars().all(|c| c.is_ascii_digit()) || rest.is_empty() {
        return None;
    }
    Some((qty, rest))
}

/// A header is a non-quantity line that looks like a word or phrase
fn is_section_header(line: &str) -> bool {
    let mut chars = line.chars();
    let starts_alpha = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    starts_alpha
        && split_quantity(line).is_none()
        && chars.all(|c| c.is_ascii_alphanumeric() || " /&'-:,".contains(c))
}

fn split_tag_list(inside: &str) -> impl Iterator<Item = &str> {
    inside.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// "Name (Ramp, Draw)" -> ("Name", {Ramp, Draw})
fn split_paren_tags(rest: &str) -> (&str, BTreeSet<String>) {
    if rest.ends_with(')') {
        if let Some((base, paren)) = rest.split_once('(') {
            let inside = &paren[..paren.len() - 1];
            let tags = split_tag_list(inside).map(str::to_string).collect();
            return (base.trim_end(), tags);
        }
    }
    (rest, BTreeSet::new())
}

/// "Name [Commander{top}, Land]" -> ("Name", {Commander, Land})
fn split_bracket_tags(name: &str) -> (&str, BTreeSet<String>) {
    let name = name.trim();
    if name.ends_with(']') {
        if let Some(open) = name.rfind('[') {
            let inside = &name[open + 1..name.len() - 1];
            let tags = split_tag_list(inside)
                .filter_map(|t| {
                    let t = t.split('{').next().unwrap_or(t).trim();
                    (!t.is_empty()).then(|| t.to_string())
                })
                .collect();
            return (name[..open].trim_end(), tags);
        }
    }
    (name, BTreeSet::new())
}

/// Parse a plain-text decklist.
///
/// Lines are `N Card Name`, optionally followed by `(tag, tag)` and/or
/// `[tag, tag]`. A `Commander` section header or a `Commander` tag marks
/// commanders. `#` comments and other non-card lines are ignored.
pub fn parse_deck_text(text: &str, deck_name: &str) -> Result<Deck, DeckError> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut inline_tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut commanders: Vec<String> = Vec::new();
    let mut section: Option<String> = None;

    for (line_num, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if is_section_header(line) {
            section = Some(line.to_lowercase());
            continue;
        }

        let Some((qty_str, rest)) = split_quantity(line) else {
            continue;
        };
        let qty: u32 = qty_str.parse().map_err(|_| DeckError::InvalidFormat {
            line: line_num + 1,
            reason: format!("'{}' is not a valid number", qty_str),
        })?;

        let (name, mut tags) = split_paren_tags(rest);
        let (name, bracket_tags) = split_bracket_tags(name);
        tags.extend(bracket_tags);

        if name.is_empty() {
            return Err(DeckError::InvalidFormat {
                line: line_num + 1,
                reason: "missing card name".to_string(),
            });
        }

        let count = counts.entry(name.to_string()).or_insert(0);
        *count = count.checked_add(qty).ok_or_else(|| DeckError::InvalidFormat {
            line: line_num + 1,
            reason: format!("too many copies of '{}'", name),
        })?;
        let is_commander = section.as_deref() == Some("commander") || tags.contains("Commander");
        inline_tags.entry(name.to_string()).or_default().extend(tags);

        if is_commander {
            let total = commanders.len().saturating_add(qty as usize);
            if total > 2 {
                return Err(DeckError::CommanderCount(total));
            }
            commanders.extend(std::iter::repeat(name.to_string()).take(qty as usize));
        }
    }

    let deck = Deck::new(deck_name, counts, commanders, inline_tags)?;
    debug!(
        "parsed deck '{}': {} commander(s), {} library cards",
        deck.name(),
        deck.commanders().len(),
        deck.library().len()
    );
    Ok(deck)
}

/// Read a decklist from disk, or stdin when `path` is `-`
pub fn parse_deck_file(path: &str) -> Result<Deck, DeckError> {
    let content = if path == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    let name = std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|_| path != "-")
        .unwrap_or("DECK");
    parse_deck_text(&content, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_list() -> String {
        "# a comment\nCommander\n1 Atraxa, Praetors' Voice\n\nDeck\n1 Sol Ring (Ramp)\n1 Rhystic Study [Draw{top}, Engine]\n97 Forest\n"
            .to_string()
    }

    #[test]
    fn test_parse_commander_section() {
        let deck = parse_deck_text(&basic_list(), "atraxa").expect("deck should parse");
        assert_eq!(deck.commanders(), &["Atraxa, Praetors' Voice".to_string()]);
        assert_eq!(deck.library().len(), 99);
        assert_eq!(deck.counts()["Forest"], 97);
        assert!(!deck.library().iter().any(|c| c == "Atraxa, Praetors' Voice"));
        assert!(deck.check_invariants());
        assert_eq!(deck.name(), "atraxa");
    }

    #[test]
    fn test_parse_inline_tags() {
        let deck = parse_deck_text(&basic_list(), "atraxa").expect("deck should parse");
        assert!(deck.inline_tags()["Sol Ring"].contains("Ramp"));
        let study = &deck.inline_tags()["Rhystic Study"];
        assert!(study.contains("Draw"));
        assert!(study.contains("Engine"));
    }

    #[test]
    fn test_commander_tag_and_partners() {
        let text = "1 Thrasios, Triton Hero [Commander{top}]\n1 Tymna the Weaver [Commander]\n98 Island\n";
        let deck = parse_deck_text(text, "partners").expect("deck should parse");
        assert_eq!(deck.commanders().len(), 2);
        assert_eq!(deck.library().len(), 98);
    }

    #[test]
    fn test_wrong_size_rejected() {
        let text = "Commander\n1 Atraxa, Praetors' Voice\n50 Forest\n";
        assert!(matches!(parse_deck_text(text, "short"), Err(DeckError::WrongSize(51))));
    }

    #[test]
    fn test_missing_commander_rejected() {
        let text = "100 Forest\n";
        assert!(matches!(parse_deck_text(text, "none"), Err(DeckError::CommanderCount(0))));
    }

    #[test]
    fn test_too_many_commanders_rejected() {
        let text = "Commander\n3 Forest\nDeck\n97 Island\n";
        assert!(matches!(parse_deck_text(text, "three"), Err(DeckError::CommanderCount(3))));
    }

    #[test]
    fn test_unknown_commander_rejected() {
        let mut counts = BTreeMap::new();
        counts.insert("Forest".to_string(), 100);
        let result = Deck::new("x", counts, vec!["Ghost".to_string()], BTreeMap::new());
        assert!(matches!(result, Err(DeckError::UnknownCommander(name)) if name == "Ghost"));
    }

    #[test]
    fn test_commander_with_zero_copies_rejected() {
        let mut counts = BTreeMap::new();
        counts.insert("Forest".to_string(), 100);
        counts.insert("Ghost".to_string(), 0);
        let result = Deck::new("x", counts, vec!["Ghost".to_string()], BTreeMap::new());
        assert!(matches!(result, Err(DeckError::UnknownCommander(name)) if name == "Ghost"));
    }

    #[test]
    fn test_same_commander_twice_needs_two_copies() {
        let mut counts = BTreeMap::new();
        counts.insert("Forest".to_string(), 99);
        counts.insert("Atraxa".to_string(), 1);
        let commanders = vec!["Atraxa".to_string(), "Atraxa".to_string()];
        let result = Deck::new("x", counts, commanders, BTreeMap::new());
        assert!(matches!(result, Err(DeckError::UnknownCommander(_))));
    }

    #[test]
    fn test_huge_quantities_rejected() {
        let text = "1 Atraxa [Commander]\n4294967295 Forest\n";
        assert!(matches!(parse_deck_text(text, "x"), Err(DeckError::WrongSize(4294967296))));

        let text = "1 Atraxa [Commander]\n4294967295 Forest\n1 Forest\n";
        assert!(matches!(parse_deck_text(text, "x"), Err(DeckError::InvalidFormat { line: 3, .. })));

        let text = "Commander\n4294967295 Atraxa\n";
        assert!(matches!(parse_deck_text(text, "x"), Err(DeckError::CommanderCount(4294967295))));
    }

    #[test]
    fn test_section_header_detection() {
        assert!(is_section_header("Commander"));
        assert!(is_section_header("Creatures & Tokens"));
        assert!(!is_section_header("1 Sol Ring"));
        assert!(!is_section_header("== notes =="));
    }

    #[test]
    fn test_split_quantity() {
        assert_eq!(split_quantity("4 Lightning Bolt"), Some(("4", "Lightning Bolt")));
        assert_eq!(split_quantity("Lightning Bolt"), None);
        assert_eq!(split_quantity("4x Lightning Bolt"), None);
    }
}
