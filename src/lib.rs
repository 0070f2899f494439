//! Tiered Validation: named, composable validation tiers for data models
//!
//! A model carries a default set of validation rules. Tiers add named groups
//! of extra rules that a record can be checked against on demand ("is this
//! account valid for `admin`?") without changing its default validity.
//! Tiers can include other tiers, and non-exclusive tiers also pull in the
//! model's default rules.
//!
//! # Core Concepts
//!
//! - **Rule**: shared validation logic that appends field-keyed errors
//! - **RuleChain**: an ordered, duplicate-free sequence of rules
//! - **TierRegistry**: a model's default rules and tiers, sealed once defined
//! - **Evaluator**: runs a tier's effective chains against a record
//!
//! # Example
//!
//! ```rust
//! use tiered_validation::core::{Errors, Record, Rule};
//! use tiered_validation::tier::{TierOptions, TierRegistry};
//!
//! #[derive(Default)]
//! struct Account {
//!     expiration_date: Option<String>,
//!     preferred: bool,
//!     errors: Errors,
//! }
//!
//! impl Record for Account {
//!     fn is_new(&self) -> bool { true }
//!     fn errors(&self) -> &Errors { &self.errors }
//!     fn errors_mut(&mut self) -> &mut Errors { &mut self.errors }
//! }
//!
//! let mut registry = TierRegistry::<Account>::new("Account");
//! registry
//!     .define_tier("user", TierOptions::new(), |tier| {
//!         tier.validate(Rule::new(|a: &Account, errors: &mut Errors| {
//!             if a.expiration_date.is_none() {
//!                 errors.add("expiration_date", "can't be blank");
//!             }
//!         }));
//!     })
//!     .unwrap();
//! registry
//!     .define_tier("cowboy", TierOptions::new().include("user"), |tier| {
//!         tier.validate(Rule::new(|a: &Account, errors: &mut Errors| {
//!             if !a.preferred {
//!                 errors.add("preferred", "is false.");
//!             }
//!         }));
//!     })
//!     .unwrap();
//!
//! let sealed = registry.seal().unwrap();
//! let evaluator = sealed.evaluator();
//!
//! let mut account = Account { preferred: true, ..Account::default() };
//! assert!(!evaluator.is_valid_for_tier("cowboy", &mut account).unwrap());
//! assert!(evaluator.is_valid(&mut account).unwrap());
//! ```

pub mod core;
pub mod evaluation;
pub mod manifest;
pub mod tier;
pub mod validators;

// Re-export commonly used types
pub use core::{Action, Errors, Record, Rule, RuleChain};
pub use evaluation::{Evaluator, Persist, SaveError};
pub use tier::{SealedRegistry, TierError, TierOptions, TierRegistry};
