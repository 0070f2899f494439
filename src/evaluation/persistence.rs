//! Save and create helpers gated on tier validation.
//!
//! Saving through a tier requires the record to pass the tier AND the
//! model's plain validation. The tier check runs first; when it fails the
//! plain check is skipped and the failure is reported as tier-specific.

use super::evaluator::Evaluator;
use crate::core::{Errors, Record};
use crate::tier::TierError;
use thiserror::Error;

/// A record that can be written to storage.
pub trait Persist: Record {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write the record. Implementations mark the record as no longer new.
    fn persist(&mut self) -> Result<(), Self::Error>;
}

/// The record failed a tier's rules.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Validation for {tier} failed: {}", .errors.full_messages().join(", "))]
pub struct RecordInvalidForTier {
    pub tier: String,
    pub errors: Errors,
}

/// The record passed the tier but failed the model's plain validation.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Validation failed: {}", .errors.full_messages().join(", "))]
pub struct RecordInvalid {
    pub errors: Errors,
}

/// Errors returned by the strict save and create helpers.
#[derive(Debug, Error)]
pub enum SaveError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    InvalidForTier(#[from] RecordInvalidForTier),

    #[error(transparent)]
    Invalid(#[from] RecordInvalid),

    #[error(transparent)]
    Tier(#[from] TierError),

    #[error("Persisting record failed: {0}")]
    Persistence(#[source] E),
}

impl<R: Persist> Evaluator<'_, R> {
    /// Persist `record` if it passes `tier` and plain validation.
    ///
    /// Returns `Ok(false)` without persisting when either check fails; the
    /// record's errors describe why.
    pub fn save_with_tier_validation(
        &self,
        tier: &str,
        record: &mut R,
    ) -> Result<bool, SaveError<R::Error>> {
        if !self.is_valid_for_tier(tier, record)? || !self.is_valid(record)? {
            return Ok(false);
        }
        record.persist().map_err(SaveError::Persistence)?;
        Ok(true)
    }

    /// Persist `record`, or report which check rejected it.
    pub fn save_with_tier_validation_strict(
        &self,
        tier: &str,
        record: &mut R,
    ) -> Result<(), SaveError<R::Error>> {
        if !self.is_valid_for_tier(tier, record)? {
            return Err(RecordInvalidForTier {
                tier: tier.to_string(),
                errors: record.errors().clone(),
            }
            .into());
        }
        if !self.is_valid(record)? {
            return Err(RecordInvalid {
                errors: record.errors().clone(),
            }
            .into());
        }
        record.persist().map_err(SaveError::Persistence)
    }

    /// Persist a freshly built record and hand it back.
    pub fn create_with_tier_validation(
        &self,
        tier: &str,
        mut record: R,
    ) -> Result<R, SaveError<R::Error>> {
        self.save_with_tier_validation_strict(tier, &mut record)?;
        Ok(record)
    }

    /// Create each record in turn, stopping at the first failure.
    ///
    /// Records created before the failure stay persisted.
    pub fn create_all_with_tier_validation<I>(
        &self,
        tier: &str,
        records: I,
    ) -> Result<Vec<R>, SaveError<R::Error>>
    where
        I: IntoIterator<Item = R>,
    {
        records
            .into_iter()
            .map(|record| self.create_with_tier_validation(tier, record))
            .collect()
    }
}
