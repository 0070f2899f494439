//! Rules: units of validation logic bound to a record type.
//!
//! A rule inspects a record and may append field-keyed messages to an error
//! sink. Rules are shared, not copied: cloning a rule yields another handle
//! with the same identity, which is what chain deduplication compares.

use super::errors::Errors;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Identity of a registered rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(Uuid);

impl RuleId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A rule that could not finish checking a record.
///
/// This is distinct from the rule *finding* problems, which it reports
/// through the error sink.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Rule {rule} failed: {message}")]
pub struct RuleError {
    pub rule: String,
    pub message: String,
}

impl RuleError {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

type RuleFn<R> = dyn Fn(&R, &mut Errors) -> Result<(), RuleError> + Send + Sync;

/// A validation rule for records of type `R`.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::{Errors, Rule};
///
/// struct Account {
///     balance: Option<f64>,
/// }
///
/// let balance_present = Rule::new(|account: &Account, errors: &mut Errors| {
///     if account.balance.is_none() {
///         errors.add("balance", "can't be blank");
///     }
/// });
///
/// let mut errors = Errors::new();
/// balance_present.check(&Account { balance: None }, &mut errors).unwrap();
/// assert!(errors.on("balance").is_some());
///
/// // Clones share identity.
/// assert_eq!(balance_present.id(), balance_present.clone().id());
/// ```
pub struct Rule<R> {
    id: RuleId,
    label: Option<Arc<str>>,
    check: Arc<RuleFn<R>>,
}

impl<R> Rule<R> {
    /// Create a rule whose body cannot fail.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&R, &mut Errors) + Send + Sync + 'static,
    {
        Self::fallible(move |record, errors| {
            check(record, errors);
            Ok(())
        })
    }

    /// Create a rule whose body may abort the evaluation.
    pub fn fallible<F>(check: F) -> Self
    where
        F: Fn(&R, &mut Errors) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        Rule {
            id: RuleId::generate(),
            label: None,
            check: Arc::new(check),
        }
    }

    /// Attach a human-readable label used in logs and manifests.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Arc::from(label.into()));
        self
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Run the rule against `record`, appending any findings to `errors`.
    pub fn check(&self, record: &R, errors: &mut Errors) -> Result<(), RuleError> {
        (self.check)(record, errors)
    }
}

impl<R> Clone for Rule<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<R> PartialEq for Rule<R> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<R> Eq for Rule<R> {}

impl<R> fmt::Debug for Rule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}
