// src/storage/mod.rs

//! Storage backends for the default adapters.

pub mod sqlite;

pub use sqlite::{StoredTurn, TurnStore};
