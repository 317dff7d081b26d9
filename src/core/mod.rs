//! Scaling, outcome resolution, dialogue traversal and the catalog build pass.

pub mod builder;
pub mod content;
pub mod lint;
pub mod dialogue;
pub mod outcome;
pub mod scaler;
pub mod store;
