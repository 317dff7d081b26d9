//! Balance Forge expands compact game-balance definitions into
//! fully populated content records.
//!
//! Races, monster variants, items, skills, dungeon events, and dialogue
//! graphs are authored as short RON rows. A build pass scales them by
//! grade, rolls their variance, validates their outcome tables and
//! conversation graphs, and writes each finished record to a catalog
//! exactly once.

pub mod core;
pub mod schema;
