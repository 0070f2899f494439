//! Evaluating records against sealed tiers.
//!
//! This is the imperative shell around the registry: it clears and fills a
//! record's error sink, picks the create or update chain from the record's
//! lifecycle, and optionally persists records that pass.
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
//! let sealed = registry.seal().unwrap();
//! let evaluator = sealed.evaluator();
//!
//! let mut account = Account::default();
//! assert!(!evaluator.is_valid_for_tier("user", &mut account).unwrap());
//! assert!(account.errors.on("expiration_date").is_some());
//!
//! account.expiration_date = Some("2030-01-01".to_string());
//! assert!(evaluator.is_valid_for_tier("user", &mut account).unwrap());
//! assert!(account.errors.is_empty());
//! ```

mod evaluator;
mod persistence;

pub use evaluator::Evaluator;
pub use persistence::{Persist, RecordInvalid, RecordInvalidForTier, SaveError};
