// src/services/mod.rs
pub mod access_facts;
pub mod access_policy_service;
pub mod access_rules;
pub mod directory;

pub use access_facts::{FactsAssembler, TeamRelation, VisibilityFacts};
pub use access_policy_service::{can_view, check_visibility, filter_visible, list_visible, visibility_grant};
pub use access_rules::{VisibilityRule, VISIBILITY_RULES};
pub use directory::{Directory, DirectorySnapshot, DirectorySource, DirectoryStore, ProjectFacts, TeamFacts};
