//! Authoring data types: what content writers declare and what the
//! builder materializes.

pub mod catalog;
pub mod dialogue;
pub mod effect;
pub mod event;
pub mod monster;
pub mod stats;
