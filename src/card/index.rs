use crate::card::types::{CardProfile, RoleSet};
use std::collections::{BTreeSet, HashMap};

/// Read-only card capability lookup used by the simulation.
///
/// Lookups are total: a name the provider does not know is a non-land
/// with mana value 0 and no roles.
pub trait CardIndex {
    fn profile(&self, name: &str) -> Option<&CardProfile>;

    fn is_land(&self, name: &str) -> bool {
        self.profile(name).map_or(false, |p| p.facts.is_land)
    }

    fn mana_value(&self, name: &str) -> u32 {
        self.profile(name).map_or(0, |p| p.facts.mana_value)
    }

    fn roles(&self, name: &str) -> RoleSet {
        self.profile(name).map_or_else(RoleSet::new, |p| p.roles)
    }

    /// Raw annotations for diagnostics; never consulted by the engine
    fn tags(&self, name: &str) -> BTreeSet<String> {
        self.profile(name).map(|p| p.tags.clone()).unwrap_or_default()
    }
}

impl CardIndex for HashMap<String, CardProfile> {
    fn profile(&self, name: &str) -> Option<&CardProfile> {
        self.get(name)
    }
}
