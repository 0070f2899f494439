//! Field-keyed error sink carried by every record.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Pseudo-field for errors that belong to the record as a whole.
pub const BASE: &str = "base";

/// A single `(field, message)` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Render the entry the way `Errors::full_messages` does.
    pub fn full_message(&self) -> String {
        if self.field == BASE {
            self.message.clone()
        } else {
            format!("{} {}", humanize(&self.field), self.message)
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())
    }
}

/// Ordered mapping from field name to the messages recorded against it.
///
/// Fields keep the order in which they first received an error, and each
/// field keeps its messages in insertion order.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::Errors;
///
/// let mut errors = Errors::new();
/// errors.add("expiration_date", "can't be blank");
///
/// assert!(!errors.is_empty());
/// assert_eq!(errors.on("expiration_date"), Some(&["can't be blank".to_string()][..]));
/// assert_eq!(errors.full_messages(), vec!["Expiration date can't be blank"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Errors {
    entries: IndexMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Append a message that is not tied to a specific field.
    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Messages recorded against `field`, if any.
    pub fn on(&self, field: &str) -> Option<&[String]> {
        self.entries.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate every `(field, message)` pair in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| (field.as_str(), message.as_str()))
        })
    }

    /// Human-readable messages, e.g. `"Number is invalid"`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(field, message)| FieldError {
                field: field.to_string(),
                message: message.to_string(),
            })
            .map(|entry| entry.full_message())
            .collect()
    }

    /// Accumulate every entry into a `Validation`.
    ///
    /// Succeeds only when the sink is empty; otherwise the failure carries
    /// all entries in order.
    pub fn to_validation(&self) -> Validation<(), NonEmptyVec<FieldError>> {
        let checks: Vec<Validation<(), NonEmptyVec<FieldError>>> = self
            .iter()
            .map(|(field, message)| {
                Validation::fail(FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                })
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }
}

/// `"expiration_date"` -> `"Expiration date"`.
fn humanize(field: &str) -> String {
    let spaced = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_accumulate_per_field_in_order() {
        let mut errors = Errors::new();
        errors.add("number", "is invalid");
        errors.add("balance", "can't be blank");
        errors.add("number", "is the wrong length (should be 6 characters)");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["number", "balance"]);
        assert_eq!(
            errors.on("number").unwrap(),
            &[
                "is invalid".to_string(),
                "is the wrong length (should be 6 characters)".to_string()
            ]
        );
        assert!(errors.on("eula").is_none());
    }

    #[test]
    fn clear_empties_the_sink() {
        let mut errors = Errors::new();
        errors.add("number", "is invalid");
        errors.clear();

        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }

    #[test]
    fn full_messages_humanize_fields() {
        let mut errors = Errors::new();
        errors.add("expiration_date", "can't be blank");
        errors.add("login_id", "is invalid");
        errors.add_to_base("Account is locked");

        assert_eq!(
            errors.full_messages(),
            vec![
                "Expiration date can't be blank",
                "Login is invalid",
                "Account is locked"
            ]
        );
    }

    #[test]
    fn humanize_strips_a_single_id_suffix() {
        assert_eq!(humanize("parent_id_id"), "Parent id");
        assert_eq!(humanize("login_id"), "Login");
        assert_eq!(humanize("identity"), "Identity");
    }

    #[test]
    fn to_validation_accumulates_every_entry() {
        let mut errors = Errors::new();
        assert!(errors.to_validation().is_success());

        errors.add("number", "is invalid");
        errors.add("balance", "can't be blank");

        match errors.to_validation() {
            Validation::Failure(entries) => {
                assert_eq!(entries.len(), 2);
                assert!(entries.iter().any(|e| e.field == "balance"));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
