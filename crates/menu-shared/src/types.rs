//! Common types

/// Store-assigned primary key.
pub type EntityId = i64;
