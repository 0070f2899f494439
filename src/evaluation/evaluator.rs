//! Running tier and plain validation against a record.

use crate::core::{Action, Errors, FieldError, Record, RuleChain, RuleId};
use crate::tier::{SealedRegistry, TierError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Evaluates records against the tiers of a sealed registry.
///
/// Every evaluation clears the record's errors first, so results never
/// carry over from a previous evaluation of another tier.
pub struct Evaluator<'r, R> {
    registry: &'r SealedRegistry<R>,
}

impl<'r, R> Evaluator<'r, R> {
    pub(crate) fn new(registry: &'r SealedRegistry<R>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SealedRegistry<R> {
        self.registry
    }
}

impl<R: Record> Evaluator<'_, R> {
    /// Whether `record` passes tier `tier`.
    ///
    /// Runs, in order: the tier's effective save chain, the remaining
    /// default save rules and the record's `validate` hook; then the same
    /// for the create or update action depending on `record.is_new()`.
    /// A rule is never run twice in one phase.
    pub fn is_valid_for_tier(&self, tier: &str, record: &mut R) -> Result<bool, TierError> {
        let follow_up = Action::for_record(record.is_new());
        let save = self.registry.effective_chain(tier, Action::Save)?;
        let action_chain = self.registry.effective_chain(tier, follow_up)?;

        let valid = self.run(record, |record, errors| {
            self.run_phase(Some(save), Action::Save, record, errors)?;
            self.run_phase(Some(action_chain), follow_up, record, errors)
        })?;

        tracing::debug!(
            model = %self.registry.model(),
            tier,
            action = %follow_up,
            valid,
            errors = record.errors().len(),
            "evaluated validation tier"
        );
        Ok(valid)
    }

    pub fn is_invalid_for_tier(&self, tier: &str, record: &mut R) -> Result<bool, TierError> {
        self.is_valid_for_tier(tier, record).map(|valid| !valid)
    }

    /// Evaluate `tier` and return every field error it produced.
    pub fn validate_for_tier(
        &self,
        tier: &str,
        record: &mut R,
    ) -> Result<Validation<(), NonEmptyVec<FieldError>>, TierError> {
        self.is_valid_for_tier(tier, record)?;
        Ok(record.errors().to_validation())
    }

    /// Whether `record` passes the model's default rules and hooks alone.
    pub fn is_valid(&self, record: &mut R) -> Result<bool, TierError> {
        let follow_up = Action::for_record(record.is_new());

        let valid = self.run(record, |record, errors| {
            self.run_phase(None, Action::Save, record, errors)?;
            self.run_phase(None, follow_up, record, errors)
        })?;

        tracing::debug!(
            model = %self.registry.model(),
            action = %follow_up,
            valid,
            errors = record.errors().len(),
            "evaluated default validation"
        );
        Ok(valid)
    }

    /// Clear the record's errors, run `phases`, and store what they found.
    ///
    /// Errors found before a failing rule are kept on the record.
    fn run<F>(&self, record: &mut R, phases: F) -> Result<bool, TierError>
    where
        F: FnOnce(&R, &mut Errors) -> Result<(), TierError>,
    {
        let mut errors = std::mem::take(record.errors_mut());
        errors.clear();

        let outcome = phases(&*record, &mut errors);
        *record.errors_mut() = errors;
        outcome?;

        Ok(record.errors().is_empty())
    }

    fn run_phase(
        &self,
        tier_chain: Option<&RuleChain<R>>,
        action: Action,
        record: &R,
        errors: &mut Errors,
    ) -> Result<(), TierError> {
        if let Some(chain) = tier_chain {
            chain.run(record, errors)?;
        }

        let already_run = |id: RuleId| tier_chain.is_some_and(|chain| chain.contains(id));
        for rule in self.registry.default_chain(action) {
            if !already_run(rule.id()) {
                rule.check(record, errors)?;
            }
        }

        match action {
            Action::Save => record.validate(errors),
            Action::Create => record.validate_on_create(errors),
            Action::Update => record.validate_on_update(errors),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rule, RuleError};
    use crate::tier::{TierOptions, TierRegistry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Account {
        number: Option<String>,
        expiration_date: Option<String>,
        persisted: bool,
        errors: Errors,
    }

    impl Record for Account {
        fn is_new(&self) -> bool {
            !self.persisted
        }

        fn errors(&self) -> &Errors {
            &self.errors
        }

        fn errors_mut(&mut self) -> &mut Errors {
            &mut self.errors
        }

        fn validate_on_update(&self, errors: &mut Errors) {
            if self.number.is_none() {
                errors.add("number", "can't be blank");
            }
        }
    }

    fn tagging(tag: &'static str) -> Rule<Account> {
        Rule::new(move |_: &Account, errors: &mut Errors| errors.add("trace", tag))
    }

    fn expiration_present() -> Rule<Account> {
        Rule::new(|a: &Account, errors: &mut Errors| {
            if a.expiration_date.is_none() {
                errors.add("expiration_date", "can't be blank");
            }
        })
    }

    fn trace(account: &Account) -> Vec<String> {
        account.errors.on("trace").map(<[String]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn exclusive_tier_does_not_affect_plain_validity() {
        let mut registry = TierRegistry::new("Account");
        registry
            .define_tier("user", TierOptions::new(), |tier| {
                tier.validate(expiration_present());
            })
            .unwrap();
        let sealed = registry.seal().unwrap();
        let evaluator = sealed.evaluator();

        let mut account = Account::default();
        assert!(!evaluator.is_valid_for_tier("user", &mut account).unwrap());
        assert!(account.errors.on("expiration_date").is_some());

        assert!(evaluator.is_valid(&mut account).unwrap());
        assert!(account.errors.is_empty());

        account.expiration_date = Some("2030-01-01".to_string());
        assert!(evaluator.is_valid_for_tier("user", &mut account).unwrap());
    }

    #[test]
    fn new_records_run_save_then_create_chains() {
        let mut registry = TierRegistry::new("Account");
        registry.validate(tagging("default-save"));
        registry.validate_on_create(tagging("default-create"));
        registry.validate_on_update(tagging("default-update"));
        registry
            .define_tier("pirate", TierOptions::new(), |tier| {
                tier.validate(tagging("save"))
                    .validate_on_create(tagging("create"))
                    .validate_on_update(tagging("update"));
            })
            .unwrap();
        let sealed = registry.seal().unwrap();
        let evaluator = sealed.evaluator();

        let mut account = Account::default();
        evaluator.is_valid_for_tier("pirate", &mut account).unwrap();
        assert_eq!(
            trace(&account),
            vec!["save", "default-save", "create", "default-create"]
        );

        account.persisted = true;
        account.number = Some("1235".to_string());
        evaluator.is_valid_for_tier("pirate", &mut account).unwrap();
        assert_eq!(
            trace(&account),
            vec!["save", "default-save", "update", "default-update"]
        );
    }

    #[test]
    fn shared_default_rule_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let counting = Rule::new(move |_: &Account, _: &mut Errors| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut registry = TierRegistry::new("Account");
        registry
            .define_tier("monkey", TierOptions::new().exclusive(false), |tier| {
                tier.validate(counting);
            })
            .unwrap();
        let sealed = registry.seal().unwrap();

        sealed
            .evaluator()
            .is_valid_for_tier("monkey", &mut Account::default())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn record_hooks_run_for_exclusive_tiers() {
        let mut registry = TierRegistry::<Account>::new("Account");
        registry.define_tier("user", TierOptions::new(), |_| {}).unwrap();
        let sealed = registry.seal().unwrap();

        let mut account = Account {
            persisted: true,
            ..Account::default()
        };
        assert!(!sealed
            .evaluator()
            .is_valid_for_tier("user", &mut account)
            .unwrap());
        assert!(account.errors.on("number").is_some());
    }

    #[test]
    fn evaluation_clears_previous_errors() {
        let mut registry = TierRegistry::new("Account");
        registry
            .define_tier("user", TierOptions::new(), |tier| {
                tier.validate(expiration_present());
            })
            .unwrap();
        registry.define_tier("open", TierOptions::new(), |_| {}).unwrap();
        let sealed = registry.seal().unwrap();
        let evaluator = sealed.evaluator();

        let mut account = Account::default();
        assert!(evaluator.is_invalid_for_tier("user", &mut account).unwrap());
        assert!(evaluator.is_valid_for_tier("open", &mut account).unwrap());
        assert!(account.errors.is_empty());
    }

    #[test]
    fn validate_for_tier_accumulates_all_errors() {
        let mut registry = TierRegistry::new("Account");
        registry
            .define_tier("user", TierOptions::new(), |tier| {
                tier.validate(expiration_present()).validate(tagging("extra"));
            })
            .unwrap();
        let sealed = registry.seal().unwrap();

        match sealed
            .evaluator()
            .validate_for_tier("user", &mut Account::default())
            .unwrap()
        {
            Validation::Failure(errors) => assert_eq!(errors.len(), 2),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn unknown_tier_is_reported() {
        let sealed = TierRegistry::<Account>::new("Account").seal().unwrap();
        let result = sealed
            .evaluator()
            .is_valid_for_tier("ghost", &mut Account::default());

        assert!(matches!(result, Err(TierError::UnknownTierReference { .. })));
    }

    #[test]
    fn failing_rule_aborts_and_keeps_partial_errors() {
        let mut registry = TierRegistry::new("Account");
        registry
            .define_tier("flaky", TierOptions::new(), |tier| {
                tier.validate(tagging("before"))
                    .validate(Rule::fallible(|_: &Account, _: &mut Errors| {
                        Err(RuleError::new("remote", "timed out"))
                    }))
                    .validate(tagging("after"));
            })
            .unwrap();
        let sealed = registry.seal().unwrap();

        let mut account = Account::default();
        let result = sealed.evaluator().is_valid_for_tier("flaky", &mut account);

        assert!(matches!(result, Err(TierError::RuleFailed(_))));
        assert_eq!(trace(&account), vec!["before"]);
    }
}
