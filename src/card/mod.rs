pub mod database;
pub mod index;
pub mod roles;
pub mod types;

pub use database::{CardDatabase, CardDatabaseError};
pub use index::CardIndex;
pub use roles::{infer_roles, roles_from_tag};
pub use types::{CardFacts, CardProfile, Role, RoleSet};
