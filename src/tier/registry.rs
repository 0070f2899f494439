//! Per-model tier registries and effective chain composition.
//!
//! A model's tiers are declared on a [`TierRegistry`] during a definition
//! phase. Sealing the registry resolves the inclusion graph once, caches
//! every effective chain, and yields a read-only [`SealedRegistry`] that
//! can be shared across threads for evaluation.

use super::definition::{ActionChains, TierScope, ValidationTier};
use super::error::TierError;
use super::options::TierOptions;
use crate::core::{Action, Rule, RuleChain};
use crate::evaluation::Evaluator;
use std::collections::{HashMap, HashSet};

/// Definition-phase registry of a model's default rules and tiers.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::{Action, Errors, Rule};
/// use tiered_validation::tier::{TierOptions, TierRegistry};
///
/// struct Account {
///     expiration_date: Option<String>,
///     preferred: bool,
/// }
///
/// let mut registry = TierRegistry::<Account>::new("Account");
///
/// registry
///     .define_tier("user", TierOptions::new(), |tier| {
///         tier.validate(Rule::new(|a: &Account, errors: &mut Errors| {
///             if a.expiration_date.is_none() {
///                 errors.add("expiration_date", "can't be blank");
///             }
///         }));
///     })
///     .unwrap();
///
/// registry
///     .define_tier("cowboy", TierOptions::new().include("user"), |tier| {
///         tier.validate(Rule::new(|a: &Account, errors: &mut Errors| {
///             if !a.preferred {
///                 errors.add("preferred", "is false.");
///             }
///         }));
///     })
///     .unwrap();
///
/// let sealed = registry.seal().unwrap();
/// assert_eq!(sealed.effective_chain("cowboy", Action::Save).unwrap().len(), 2);
/// ```
pub struct TierRegistry<R> {
    model: String,
    defaults: ActionChains<R>,
    tiers: HashMap<String, ValidationTier<R>>,
    order: Vec<String>,
}

impl<R> TierRegistry<R> {
    /// Create an empty registry for the model named `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            defaults: ActionChains::new(),
            tiers: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Register a default (untiered) rule for `action`.
    pub fn register(&mut self, action: Action, rule: Rule<R>) -> &mut Self {
        self.defaults.get_mut(action).push(rule);
        self
    }

    pub fn validate(&mut self, rule: Rule<R>) -> &mut Self {
        self.register(Action::Save, rule)
    }

    pub fn validate_on_create(&mut self, rule: Rule<R>) -> &mut Self {
        self.register(Action::Create, rule)
    }

    pub fn validate_on_update(&mut self, rule: Rule<R>) -> &mut Self {
        self.register(Action::Update, rule)
    }

    /// The model's default chain for `action`, including rules spliced in
    /// by non-exclusive tiers.
    pub fn default_chain(&self, action: Action) -> &RuleChain<R> {
        self.defaults.get(action)
    }

    /// Define a tier named `name` and run `body` to register its rules.
    ///
    /// Included tiers may be defined later; they are resolved when the
    /// registry is sealed. An inclusion that would close a cycle through
    /// already-defined tiers is rejected before `body` runs.
    ///
    /// Redefining a tier replaces it. Rules the old definition shared with
    /// the default chain stay there.
    pub fn define_tier<F>(
        &mut self,
        name: impl Into<String>,
        options: TierOptions,
        body: F,
    ) -> Result<(), TierError>
    where
        F: FnOnce(&mut TierScope<'_, R>),
    {
        let name = name.into();
        let TierOptions {
            includes,
            exclusive,
        } = options;

        self.check_acyclic(&name, &includes)?;

        let mut chains = ActionChains::new();
        body(&mut TierScope::new(
            &name,
            exclusive,
            &mut chains,
            &mut self.defaults,
        ));

        tracing::debug!(
            model = %self.model,
            tier = %name,
            exclusive,
            includes = ?includes,
            save = chains.get(Action::Save).len(),
            create = chains.get(Action::Create).len(),
            update = chains.get(Action::Update).len(),
            "defined validation tier"
        );

        let tier = ValidationTier::new(
            name.clone(),
            self.model.clone(),
            includes,
            exclusive,
            chains,
        );
        if self.tiers.insert(name.clone(), tier).is_some() {
            tracing::warn!(model = %self.model, tier = %name, "validation tier redefined");
        } else {
            self.order.push(name);
        }
        Ok(())
    }

    pub fn tier(&self, name: &str) -> Option<&ValidationTier<R>> {
        self.tiers.get(name)
    }

    /// Tier names in definition order.
    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Compose the effective chain for `name` and `action` without caching.
    ///
    /// Useful while tiers are still being defined; fails if an included
    /// tier does not exist yet.
    pub fn effective_chain(&self, name: &str, action: Action) -> Result<RuleChain<R>, TierError> {
        self.compose(name, action, None, &mut Vec::new())
    }

    /// Resolve every tier's effective chains and end the definition phase.
    pub fn seal(self) -> Result<SealedRegistry<R>, TierError> {
        let mut effective = HashMap::with_capacity(self.order.len());
        for name in &self.order {
            let mut chains = ActionChains::new();
            for action in Action::ALL {
                *chains.get_mut(action) = self.compose(name, action, None, &mut Vec::new())?;
            }
            effective.insert(name.clone(), chains);
        }

        tracing::debug!(model = %self.model, tiers = self.order.len(), "sealed tier registry");

        Ok(SealedRegistry {
            model: self.model,
            defaults: self.defaults,
            tiers: self.tiers,
            order: self.order,
            effective,
        })
    }

    /// Own rules, then default rules unless exclusive, then each included
    /// tier's effective rules in order. Later duplicates are dropped.
    fn compose(
        &self,
        name: &str,
        action: Action,
        referenced_by: Option<&str>,
        stack: &mut Vec<String>,
    ) -> Result<RuleChain<R>, TierError> {
        let tier = self
            .tiers
            .get(name)
            .ok_or_else(|| TierError::UnknownTierReference {
                model: self.model.clone(),
                tier: name.to_string(),
                referenced_by: referenced_by.map(str::to_string),
            })?;

        // define_tier rejects every edge that closes a cycle, so this only
        // bounds recursion should that ever stop holding.
        if let Some(start) = stack.iter().position(|visited| visited == name) {
            let mut path = stack[start..].to_vec();
            path.push(name.to_string());
            return Err(TierError::CyclicInclusion {
                model: self.model.clone(),
                path,
            });
        }

        stack.push(name.to_string());
        let mut chain = tier.raw_chain(action).clone();
        if !tier.is_exclusive() {
            chain.extend_from(self.defaults.get(action));
        }
        for included in tier.includes() {
            let nested = self.compose(included, action, Some(name), stack)?;
            chain.extend_from(&nested);
        }
        stack.pop();

        tracing::trace!(
            model = %self.model,
            tier = %name,
            %action,
            rules = chain.len(),
            "composed effective chain"
        );
        Ok(chain)
    }

    fn check_acyclic(&self, name: &str, includes: &[String]) -> Result<(), TierError> {
        for included in includes {
            if let Some(path) = self.path_between(included, name, &mut HashSet::new()) {
                let mut cycle = vec![name.to_string()];
                cycle.extend(path);
                return Err(TierError::CyclicInclusion {
                    model: self.model.clone(),
                    path: cycle,
                });
            }
        }
        Ok(())
    }

    /// Inclusion path from `from` to `target` through defined tiers.
    fn path_between(
        &self,
        from: &str,
        target: &str,
        visited: &mut HashSet<String>,
    ) -> Option<Vec<String>> {
        if from == target {
            return Some(vec![target.to_string()]);
        }
        if !visited.insert(from.to_string()) {
            return None;
        }
        let tier = self.tiers.get(from)?;
        for next in tier.includes() {
            if let Some(mut path) = self.path_between(next, target, visited) {
                path.insert(0, from.to_string());
                return Some(path);
            }
        }
        None
    }
}

/// Read-only registry produced by [`TierRegistry::seal`].
///
/// Effective chains are computed once at sealing and never change.
pub struct SealedRegistry<R> {
    model: String,
    defaults: ActionChains<R>,
    tiers: HashMap<String, ValidationTier<R>>,
    order: Vec<String>,
    effective: HashMap<String, ActionChains<R>>,
}

impl<R> SealedRegistry<R> {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn default_chain(&self, action: Action) -> &RuleChain<R> {
        self.defaults.get(action)
    }

    pub fn tier(&self, name: &str) -> Option<&ValidationTier<R>> {
        self.tiers.get(name)
    }

    /// Tier names in definition order.
    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// The cached effective chain for `name` and `action`.
    pub fn effective_chain(&self, name: &str, action: Action) -> Result<&RuleChain<R>, TierError> {
        self.effective
            .get(name)
            .map(|chains| chains.get(action))
            .ok_or_else(|| TierError::UnknownTierReference {
                model: self.model.clone(),
                tier: name.to_string(),
                referenced_by: None,
            })
    }

    pub(crate) fn default_chains(&self) -> &ActionChains<R> {
        &self.defaults
    }

    pub(crate) fn effective_chains(&self, name: &str) -> Option<&ActionChains<R>> {
        self.effective.get(name)
    }

    /// Evaluate records against this registry's tiers.
    pub fn evaluator(&self) -> Evaluator<'_, R> {
        Evaluator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Errors;

    fn noop() -> Rule<()> {
        Rule::new(|_: &(), _: &mut Errors| {})
    }

    fn define(
        registry: &mut TierRegistry<()>,
        name: &str,
        options: TierOptions,
        rules: &[Rule<()>],
    ) {
        registry
            .define_tier(name, options, |tier| {
                for rule in rules {
                    tier.validate(rule.clone());
                }
            })
            .unwrap();
    }

    #[test]
    fn exclusive_tier_leaves_defaults_out() {
        let default_rule = noop();
        let own = noop();
        let mut registry = TierRegistry::new("Account");
        registry.validate(default_rule.clone());
        define(&mut registry, "user", TierOptions::new(), &[own.clone()]);

        let chain = registry.effective_chain("user", Action::Save).unwrap();
        assert_eq!(chain.ids(), vec![own.id()]);
        assert_eq!(registry.default_chain(Action::Save).ids(), vec![default_rule.id()]);
    }

    #[test]
    fn non_exclusive_tier_merges_defaults_after_own_rules() {
        let default_rule = noop();
        let own = noop();
        let mut registry = TierRegistry::new("Account");
        registry.validate(default_rule.clone());
        define(&mut registry, "monkey", TierOptions::new().exclusive(false), &[own.clone()]);

        let chain = registry.effective_chain("monkey", Action::Save).unwrap();
        assert_eq!(chain.ids(), vec![own.id(), default_rule.id()]);
        // The shared rule also joined the default chain, once.
        assert_eq!(
            registry.default_chain(Action::Save).ids(),
            vec![default_rule.id(), own.id()]
        );
    }

    #[test]
    fn included_rules_follow_own_rules_in_include_order() {
        let (a, b, c, shared) = (noop(), noop(), noop(), noop());
        let mut registry = TierRegistry::new("Account");
        define(&mut registry, "a", TierOptions::new(), &[a.clone(), shared.clone()]);
        define(&mut registry, "b", TierOptions::new(), &[shared.clone(), b.clone()]);
        define(&mut registry, "c", TierOptions::new().includes(["a", "b"]), &[c.clone()]);

        let chain = registry.effective_chain("c", Action::Save).unwrap();
        assert_eq!(chain.ids(), vec![c.id(), a.id(), shared.id(), b.id()]);
    }

    #[test]
    fn includes_may_be_defined_later() {
        let mut registry = TierRegistry::new("Account");
        define(&mut registry, "cowboy", TierOptions::new().include("user"), &[noop()]);

        let err = registry.effective_chain("cowboy", Action::Save).unwrap_err();
        assert!(matches!(
            err,
            TierError::UnknownTierReference { ref tier, referenced_by: Some(ref by), .. }
                if tier == "user" && by == "cowboy"
        ));

        define(&mut registry, "user", TierOptions::new(), &[noop()]);
        assert_eq!(registry.effective_chain("cowboy", Action::Save).unwrap().len(), 2);
    }

    #[test]
    fn seal_rejects_unknown_includes() {
        let mut registry = TierRegistry::new("Account");
        define(&mut registry, "cowboy", TierOptions::new().include("user"), &[]);

        assert!(matches!(
            registry.seal(),
            Err(TierError::UnknownTierReference { .. })
        ));
    }

    #[test]
    fn self_inclusion_is_rejected() {
        let mut registry: TierRegistry<()> = TierRegistry::new("Account");
        let err = registry
            .define_tier("loop", TierOptions::new().include("loop"), |_| {})
            .unwrap_err();

        assert_eq!(
            err,
            TierError::CyclicInclusion {
                model: "Account".to_string(),
                path: vec!["loop".to_string(), "loop".to_string()],
            }
        );
        assert!(registry.tier("loop").is_none());
    }

    #[test]
    fn transitive_cycle_is_rejected_before_body_runs() {
        let mut registry = TierRegistry::new("Account");
        define(&mut registry, "a", TierOptions::new().include("b"), &[]);
        define(&mut registry, "b", TierOptions::new().include("c"), &[]);

        let mut body_ran = false;
        let err = registry
            .define_tier("c", TierOptions::new().include("a").exclusive(false), |_| {
                body_ran = true;
            })
            .unwrap_err();

        assert!(!body_ran);
        match err {
            TierError::CyclicInclusion { path, .. } => assert_eq!(path, vec!["c", "a", "b", "c"]),
            other => panic!("Expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn forward_reference_cycle_is_rejected_when_closed() {
        let mut registry = TierRegistry::new("Account");
        define(&mut registry, "a", TierOptions::new().include("b"), &[]);

        let err = registry
            .define_tier("b", TierOptions::new().include("a"), |_| {})
            .unwrap_err();

        match err {
            TierError::CyclicInclusion { path, .. } => assert_eq!(path, vec!["b", "a", "b"]),
            other => panic!("Expected cycle, got {other:?}"),
        }
        assert!(registry.tier("b").is_none());
        assert!(matches!(
            registry.seal(),
            Err(TierError::UnknownTierReference { .. })
        ));
    }

    #[test]
    fn redefinition_replaces_tier_and_keeps_position() {
        let first = noop();
        let second = noop();
        let mut registry = TierRegistry::new("Account");
        define(&mut registry, "user", TierOptions::new(), &[first]);
        define(&mut registry, "admin", TierOptions::new(), &[]);
        define(&mut registry, "user", TierOptions::new(), &[second.clone()]);

        assert_eq!(registry.tier_names().collect::<Vec<_>>(), vec!["user", "admin"]);
        assert_eq!(
            registry.effective_chain("user", Action::Save).unwrap().ids(),
            vec![second.id()]
        );
    }

    #[test]
    fn sealed_chains_match_lazy_composition() {
        let mut registry = TierRegistry::new("Account");
        registry.validate(noop());
        define(&mut registry, "user", TierOptions::new(), &[noop()]);
        define(
            &mut registry,
            "admin",
            TierOptions::new().include("user").exclusive(false),
            &[noop()],
        );

        let lazy: Vec<_> = Action::ALL
            .iter()
            .map(|&action| registry.effective_chain("admin", action).unwrap().ids())
            .collect();
        let sealed = registry.seal().unwrap();
        let cached: Vec<_> = Action::ALL
            .iter()
            .map(|&action| sealed.effective_chain("admin", action).unwrap().ids())
            .collect();

        assert_eq!(lazy, cached);
    }

    #[test]
    fn sealed_registry_reports_unknown_tier() {
        let sealed = TierRegistry::<()>::new("Account").seal().unwrap();
        assert!(matches!(
            sealed.effective_chain("ghost", Action::Save),
            Err(TierError::UnknownTierReference { referenced_by: None, .. })
        ));
    }

    #[test]
    fn sealed_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SealedRegistry<()>>();
    }
}
