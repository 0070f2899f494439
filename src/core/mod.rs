//! Core validation primitives.
//!
//! This module contains the leaf types every other part builds on:
//! - `Action`: the lifecycle a rule chain belongs to
//! - `Errors`: the field-keyed error sink a record carries
//! - `Record`: the contract a validatable record fulfils
//! - `Rule` and `RuleChain`: shared validation logic and its ordered,
//!   duplicate-free container

mod action;
mod chain;
mod errors;
mod record;
mod rule;

pub use action::Action;
pub use chain::RuleChain;
pub use errors::{Errors, FieldError, BASE};
pub use record::Record;
pub use rule::{Rule, RuleError, RuleId};
