//! Serializable snapshots of a sealed tier registry.
//!
//! A manifest records, for one model, the default chains and every tier's
//! includes, exclusivity and effective chains as rule ids and labels. It
//! contains no rule logic, only enough to inspect or diff a composed
//! tier graph.

use crate::core::{Action, RuleChain, RuleId};
use crate::tier::{ActionChains, SealedRegistry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::ManifestError;

/// Version identifier for manifest format
pub const MANIFEST_VERSION: u32 = 1;

/// A rule as it appears in a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub id: RuleId,
    pub label: Option<String>,
}

/// Rule descriptors for each action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub save: Vec<RuleDescriptor>,
    pub create: Vec<RuleDescriptor>,
    pub update: Vec<RuleDescriptor>,
}

impl ChainSnapshot {
    fn capture<R>(chains: &ActionChains<R>) -> Self {
        Self {
            save: describe(chains.get(Action::Save)),
            create: describe(chains.get(Action::Create)),
            update: describe(chains.get(Action::Update)),
        }
    }

    pub fn get(&self, action: Action) -> &[RuleDescriptor] {
        match action {
            Action::Save => &self.save,
            Action::Create => &self.create,
            Action::Update => &self.update,
        }
    }
}

/// One tier in a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierEntry {
    pub name: String,
    pub includes: Vec<String>,
    pub exclusive: bool,

    /// Effective chains after inclusion and default merging
    pub effective: ChainSnapshot,
}

/// Snapshot of a sealed registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierManifest {
    /// Manifest format version
    pub version: u32,

    /// Unique manifest identifier
    pub id: String,

    /// When the manifest was captured
    pub generated_at: DateTime<Utc>,

    /// Model the tiers validate
    pub model: String,

    /// The model's default chains
    pub defaults: ChainSnapshot,

    /// Tiers in definition order
    pub tiers: Vec<TierEntry>,
}

impl TierManifest {
    /// Capture the current composition of `registry`.
    pub fn capture<R>(registry: &SealedRegistry<R>) -> Self {
        let tiers = registry
            .tier_names()
            .filter_map(|name| {
                let tier = registry.tier(name)?;
                let effective = registry.effective_chains(name)?;
                Some(TierEntry {
                    name: name.to_string(),
                    includes: tier.includes().to_vec(),
                    exclusive: tier.is_exclusive(),
                    effective: ChainSnapshot::capture(effective),
                })
            })
            .collect();

        Self {
            version: MANIFEST_VERSION,
            id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            model: registry.model().to_string(),
            defaults: ChainSnapshot::capture(registry.default_chains()),
            tiers,
        }
    }

    pub fn tier(&self, name: &str) -> Option<&TierEntry> {
        self.tiers.iter().find(|entry| entry.name == name)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)
            .map_err(|e| ManifestError::DeserializationFailed(e.to_string()))?;
        manifest.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        bincode::serialize(self).map_err(|e| ManifestError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        let manifest: Self = bincode::deserialize(bytes)
            .map_err(|e| ManifestError::DeserializationFailed(e.to_string()))?;
        manifest.check_version()
    }

    fn check_version(self) -> Result<Self, ManifestError> {
        if self.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: self.version,
                supported: MANIFEST_VERSION,
            });
        }
        Ok(self)
    }
}

fn describe<R>(chain: &RuleChain<R>) -> Vec<RuleDescriptor> {
    chain
        .iter()
        .map(|rule| RuleDescriptor {
            id: rule.id(),
            label: rule.label().map(str::to_string),
        })
        .collect()
}
