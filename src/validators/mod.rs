//! Stock rules for common field checks.
//!
//! Each constructor takes the field name used for error keys and an
//! accessor that reads the field from the record. They are conveniences
//! over [`Rule::new`]; anything more specific should be written as a rule
//! directly.
//!
//! # Example
//!
//! ```rust
//! use regex::Regex;
//! use tiered_validation::core::Errors;
//! use tiered_validation::validators;
//!
//! struct Account {
//!     number: Option<String>,
//! }
//!
//! let format = validators::format_of(
//!     "number",
//!     Regex::new(r"^1\d{3}").unwrap(),
//!     false,
//!     |a: &Account| a.number.clone(),
//! );
//!
//! let mut errors = Errors::new();
//! format.check(&Account { number: Some("234567".into()) }, &mut errors).unwrap();
//! assert_eq!(errors.on("number").unwrap(), &["is invalid".to_string()]);
//! ```

use crate::core::{Errors, Rule};
use regex::Regex;
use std::fmt::Display;
use std::ops::RangeInclusive;

pub const BLANK: &str = "can't be blank";
pub const INVALID: &str = "is invalid";
pub const NOT_INCLUDED: &str = "is not included in the list";
pub const RESERVED: &str = "is reserved";
pub const NOT_ACCEPTED: &str = "must be accepted";
pub const CONFIRMATION: &str = "doesn't match confirmation";
pub const NOT_A_NUMBER: &str = "is not a number";

/// The field must be present and not blank.
pub fn presence_of<R, T, F>(field: &str, value: F) -> Rule<R>
where
    T: Display,
    F: Fn(&R) -> Option<T> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        let present = value(record).is_some_and(|v| !v.to_string().trim().is_empty());
        if !present {
            errors.add(key.as_str(), BLANK);
        }
    })
    .labeled(format!("presence_of({field})"))
}

/// The field must match `pattern`. A missing value fails unless
/// `allow_nil` is set.
pub fn format_of<R, F>(field: &str, pattern: Regex, allow_nil: bool, value: F) -> Rule<R>
where
    F: Fn(&R) -> Option<String> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        let matches = match value(record) {
            Some(text) => pattern.is_match(&text),
            None => allow_nil,
        };
        if !matches {
            errors.add(key.as_str(), INVALID);
        }
    })
    .labeled(format!("format_of({field})"))
}

/// The field must be exactly `length` characters long.
pub fn length_is<R, F>(field: &str, length: usize, value: F) -> Rule<R>
where
    F: Fn(&R) -> Option<String> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        let actual = value(record).map(|text| text.chars().count());
        if actual != Some(length) {
            errors.add(
                key.as_str(),
                format!("is the wrong length (should be {length} characters)"),
            );
        }
    })
    .labeled(format!("length_is({field})"))
}

/// The field must fall within `range`.
pub fn inclusion_in<R, T, F>(field: &str, range: RangeInclusive<T>, value: F) -> Rule<R>
where
    T: PartialOrd + Send + Sync + 'static,
    F: Fn(&R) -> Option<T> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        if !value(record).is_some_and(|v| range.contains(&v)) {
            errors.add(key.as_str(), NOT_INCLUDED);
        }
    })
    .labeled(format!("inclusion_in({field})"))
}

/// The field must not be one of `reserved`. A missing value passes.
pub fn exclusion_of<R, F>(field: &str, reserved: Vec<String>, value: F) -> Rule<R>
where
    F: Fn(&R) -> Option<String> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        if value(record).is_some_and(|v| reserved.contains(&v)) {
            errors.add(key.as_str(), RESERVED);
        }
    })
    .labeled(format!("exclusion_of({field})"))
}

/// The field must be accepted. A missing value passes.
pub fn acceptance_of<R, F>(field: &str, value: F) -> Rule<R>
where
    F: Fn(&R) -> Option<bool> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        if value(record) == Some(false) {
            errors.add(key.as_str(), NOT_ACCEPTED);
        }
    })
    .labeled(format!("acceptance_of({field})"))
}

/// The field must equal its confirmation when a confirmation is given.
pub fn confirmation_of<R, F, C>(field: &str, value: F, confirmation: C) -> Rule<R>
where
    F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    C: Fn(&R) -> Option<String> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        if let Some(confirmed) = confirmation(record) {
            if value(record).as_ref() != Some(&confirmed) {
                errors.add(key.as_str(), CONFIRMATION);
            }
        }
    })
    .labeled(format!("confirmation_of({field})"))
}

/// The field must parse as a number.
pub fn numericality_of<R, F>(field: &str, value: F) -> Rule<R>
where
    F: Fn(&R) -> Option<String> + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        let numeric = value(record).is_some_and(|text| text.trim().parse::<f64>().is_ok());
        if !numeric {
            errors.add(key.as_str(), NOT_A_NUMBER);
        }
    })
    .labeled(format!("numericality_of({field})"))
}

/// Hand the field's value to `check`, which records its own errors.
pub fn each<R, T, F, G>(field: &str, value: F, check: G) -> Rule<R>
where
    F: Fn(&R) -> T + Send + Sync + 'static,
    G: Fn(&R, &str, T, &mut Errors) + Send + Sync + 'static,
{
    let key = field.to_string();
    Rule::new(move |record: &R, errors: &mut Errors| {
        check(record, key.as_str(), value(record), errors);
    })
    .labeled(format!("each({field})"))
}
