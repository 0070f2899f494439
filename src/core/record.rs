//! The record collaborator contract.
//!
//! Tiers never own records. They only need to know whether a record is new,
//! where its errors live, and which unconditional default hooks it carries.

use super::errors::Errors;

/// A validatable record.
///
/// The three hooks are the model's own baseline checks. They run on every
/// evaluation, tiered or not, and default to doing nothing.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::{Errors, Record};
///
/// struct Login {
///     username: Option<String>,
///     persisted: bool,
///     errors: Errors,
/// }
///
/// impl Record for Login {
///     fn is_new(&self) -> bool {
///         !self.persisted
///     }
///
///     fn errors(&self) -> &Errors {
///         &self.errors
///     }
///
///     fn errors_mut(&mut self) -> &mut Errors {
///         &mut self.errors
///     }
///
///     fn validate(&self, errors: &mut Errors) {
///         if self.username.is_none() {
///             errors.add("username", "can't be blank");
///         }
///     }
/// }
/// ```
pub trait Record {
    /// True until the record has been persisted.
    fn is_new(&self) -> bool;

    fn errors(&self) -> &Errors;

    fn errors_mut(&mut self) -> &mut Errors;

    /// Baseline check run for every action.
    fn validate(&self, _errors: &mut Errors) {}

    /// Baseline check run for new records.
    fn validate_on_create(&self, _errors: &mut Errors) {}

    /// Baseline check run for persisted records.
    fn validate_on_update(&self, _errors: &mut Errors) {}
}
