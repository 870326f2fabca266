//! Intervention Rules
//!
//! Maps the current frame's class-wide statistics to at most one suggested
//! instructor action.

mod rules;

pub use rules::{Intervention, InterventionConfig, InterventionRules};
