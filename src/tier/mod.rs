//! Validation tiers and their registry.
//!
//! A tier is a named group of rules layered over a model's default rules.
//! Tiers can include other tiers; the registry merges a tier's own rules,
//! the default rules (for non-exclusive tiers) and every included tier's
//! rules into one ordered, duplicate-free effective chain per action.
//!
//! # Example
//!
//! ```rust
//! use tiered_validation::core::{Action, Errors, Rule};
//! use tiered_validation::tier::{TierOptions, TierRegistry};
//!
//! struct Account {
//!     number: Option<String>,
//! }
//!
//! let mut registry = TierRegistry::<Account>::new("Account");
//! registry
//!     .define_tier("monkey", TierOptions::new().exclusive(false), |tier| {
//!         tier.validate(Rule::new(|a: &Account, errors: &mut Errors| {
//!             if a.number.as_deref().is_some_and(|n| !n.starts_with('1')) {
//!                 errors.add("number", "is invalid");
//!             }
//!         }));
//!     })
//!     .unwrap();
//!
//! let sealed = registry.seal().unwrap();
//! // Non-exclusive rules are shared with the default chain.
//! assert_eq!(sealed.default_chain(Action::Save).len(), 1);
//! ```

mod definition;
mod error;
mod options;
mod registry;

pub use definition::{ActionChains, TierScope, ValidationTier};
pub use error::TierError;
pub use options::TierOptions;
pub use registry::{SealedRegistry, TierRegistry};
