//! Options accepted when defining a tier.

use serde::{Deserialize, Deserializer, Serialize};

/// How a tier relates to other tiers and to the model's default rules.
///
/// Tiers are exclusive unless told otherwise. Options deserialize from
/// configuration, where `includes` may be a single name or a list.
///
/// # Example
///
/// ```rust
/// use tiered_validation::tier::TierOptions;
///
/// let options = TierOptions::new().include("user").exclusive(false);
/// assert_eq!(options.includes, vec!["user".to_string()]);
/// assert!(!options.exclusive);
///
/// let from_config: TierOptions = serde_json::from_str(r#"{"includes": "user"}"#).unwrap();
/// assert_eq!(from_config.includes, vec!["user".to_string()]);
/// assert!(from_config.exclusive);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierOptions {
    #[serde(deserialize_with = "one_or_many")]
    pub includes: Vec<String>,
    pub exclusive: bool,
}

impl TierOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include one more tier.
    pub fn include(mut self, tier: impl Into<String>) -> Self {
        self.includes.push(tier.into());
        self
    }

    /// Include several tiers, in order.
    pub fn includes<I, T>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.includes.extend(tiers.into_iter().map(Into::into));
        self
    }

    /// Whether the model's default rules stay out of the tier's own chain.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }
}

impl Default for TierOptions {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            exclusive: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}
