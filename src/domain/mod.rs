//! Domain layer types and invariants.

pub mod articles;
pub mod document;
pub mod embeds;
pub mod nodes;
