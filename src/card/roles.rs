//! Role derivation: oracle-text heuristics and decklist tag normalisation.

use crate::card::types::{CardFacts, Role, RoleSet};

const EVASION_KEYWORDS: &[&str] = &[
    "flying",
    "menace",
    "trample",
    "unblockable",
    "can't be blocked",
    "fear",
    "intimidate",
    "shadow",
];

/// Infer roles from a card's rules text and types
pub fn infer_roles(facts: &CardFacts) -> RoleSet {
    let txt = facts.oracle_text.to_lowercase();
    let mut roles = RoleSet::new();

    if !facts.is_land {
        let permanent_mana = txt.contains("add {")
            && (facts.is_artifact || facts.is_creature || facts.is_enchantment);
        let land_search = txt.contains("search your library")
            && txt.contains("land")
            && (txt.contains("onto the battlefield") || txt.contains("put"));
        if permanent_mana || land_search {
            roles.insert(Role::Ramp);
        }
    }

    if txt.contains("draw") && txt.contains("card") {
        if facts.is_instant || facts.is_sorcery {
            roles.insert(Role::Refill);
        } else if txt.contains("whenever") || txt.contains("at the beginning") || txt.contains("each") {
            roles.insert(Role::DrawEngine);
        }
    }

    if txt.contains("you win the game") || txt.contains("wins the game") {
        roles.insert(Role::Wincon);
    }

    if facts.is_creature {
        if facts.power.map_or(false, |p| p >= 4) {
            roles.insert(Role::Damage);
        }
        if EVASION_KEYWORDS.iter().any(|k| txt.contains(k)) {
            roles.insert(Role::Evasion);
        }
    }

    if txt.contains("additional combat") {
        roles.insert(Role::ExtraCombat);
    }

    roles
}

/// Exact role name, ignoring case and spaces ("Draw Engine" -> DrawEngine)
fn direct_role(key: &str) -> Option<Role> {
    Role::ALL
        .into_iter()
        .find(|r| r.as_str().to_lowercase() == key)
}

/// Normalise a free-form decklist tag into roles.
///
/// Accepts exact role names, loose synonyms ("Card Advantage", "Wheel",
/// "Combo") and namespaced `Mx:<Category>` tags.
pub fn roles_from_tag(tag: &str) -> RoleSet {
    let raw = tag.trim();
    if raw.is_empty() {
        return RoleSet::new();
    }

    let t = match raw.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("mx:") => raw[3..].trim(),
        _ => raw,
    };
    let low = t.to_lowercase();

    let key: String = low.chars().filter(|c| *c != ' ').collect();
    if let Some(role) = direct_role(&key) {
        return RoleSet::new().with(role);
    }

    let any = |keys: &[&str]| keys.iter().any(|k| low.contains(k));
    let mut out = RoleSet::new();

    if any(&["ramp", "mana", "rock", "dork", "accelerat"]) {
        out.insert(Role::Ramp);
    }
    if any(&["draw", "card advantage", "advantage", "engine"]) {
        out.insert(Role::DrawEngine);
    }
    if any(&["wheel", "refill", "reload"]) {
        out.insert(Role::Refill);
    }
    if any(&["win", "combo", "finisher", "payoff"]) {
        out.insert(Role::Wincon);
    }
    if any(&["evasion", "unblock", "flying", "menace", "trample"]) {
        out.insert(Role::Evasion);
    }
    if any(&["extra combat", "combat step"]) {
        out.insert(Role::ExtraCombat);
    }
    if any(&["threat", "damage", "beatdown", "pressure"]) {
        out.insert(Role::Damage);
    }

    out
}
