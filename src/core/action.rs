//! Lifecycle actions a rule can be registered for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle action a rule chain belongs to.
///
/// `Save` rules run on every evaluation. `Create` rules run only for new
/// records and `Update` rules only for records that were already persisted.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::Action;
///
/// assert_eq!(Action::for_record(true), Action::Create);
/// assert_eq!(Action::for_record(false), Action::Update);
/// assert_eq!(Action::Save.default_hook(), "validate");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Save,
    Create,
    Update,
}

impl Action {
    /// All actions, in evaluation order.
    pub const ALL: [Action; 3] = [Action::Save, Action::Create, Action::Update];

    /// Name of the model's default entry point this action maps onto.
    pub fn default_hook(self) -> &'static str {
        match self {
            Self::Save => "validate",
            Self::Create => "validate_on_create",
            Self::Update => "validate_on_update",
        }
    }

    /// The record-specific action that follows `Save`.
    pub fn for_record(is_new: bool) -> Self {
        if is_new {
            Self::Create
        } else {
            Self::Update
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
