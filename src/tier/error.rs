//! Structural errors raised while defining, composing or evaluating tiers.

use crate::core::RuleError;
use thiserror::Error;

/// Errors that can occur when composing or evaluating validation tiers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TierError {
    #[error("Unknown validation tier '{tier}' on {model}{}", included_by(.referenced_by))]
    UnknownTierReference {
        model: String,
        tier: String,
        referenced_by: Option<String>,
    },

    #[error("Cyclic tier inclusion on {model}: {}", .path.join(" -> "))]
    CyclicInclusion { model: String, path: Vec<String> },

    #[error(transparent)]
    RuleFailed(#[from] RuleError),
}

fn included_by(referenced_by: &Option<String>) -> String {
    match referenced_by {
        Some(tier) => format!(" (included by '{tier}')"),
        None => String::new(),
    }
}
