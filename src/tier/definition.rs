//! Validation tiers and the scope their definition body runs in.

use crate::core::{Action, Rule, RuleChain};

/// One rule chain per action.
pub struct ActionChains<R> {
    save: RuleChain<R>,
    create: RuleChain<R>,
    update: RuleChain<R>,
}

impl<R> ActionChains<R> {
    pub fn new() -> Self {
        Self {
            save: RuleChain::new(),
            create: RuleChain::new(),
            update: RuleChain::new(),
        }
    }

    pub fn get(&self, action: Action) -> &RuleChain<R> {
        match action {
            Action::Save => &self.save,
            Action::Create => &self.create,
            Action::Update => &self.update,
        }
    }

    pub(crate) fn get_mut(&mut self, action: Action) -> &mut RuleChain<R> {
        match action {
            Action::Save => &mut self.save,
            Action::Create => &mut self.create,
            Action::Update => &mut self.update,
        }
    }
}

impl<R> Default for ActionChains<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ActionChains<R> {
    fn clone(&self) -> Self {
        Self {
            save: self.save.clone(),
            create: self.create.clone(),
            update: self.update.clone(),
        }
    }
}

/// A named group of rules layered over a model's default validation.
///
/// A tier is built once, when its definition body runs, and never changes
/// afterwards. Its raw chains hold only the rules registered in its own
/// body; see [`TierRegistry::effective_chain`](super::TierRegistry::effective_chain)
/// for the merged view.
pub struct ValidationTier<R> {
    name: String,
    owner: String,
    includes: Vec<String>,
    exclusive: bool,
    chains: ActionChains<R>,
}

impl<R> ValidationTier<R> {
    pub(crate) fn new(
        name: String,
        owner: String,
        includes: Vec<String>,
        exclusive: bool,
        chains: ActionChains<R>,
    ) -> Self {
        Self {
            name,
            owner,
            includes,
            exclusive,
            chains,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the model this tier validates.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Rules registered directly in this tier's body for `action`.
    pub fn raw_chain(&self, action: Action) -> &RuleChain<R> {
        self.chains.get(action)
    }

    /// Entry point name for `action`, e.g. `validate_on_create_for_pirate`.
    pub fn entry_point(&self, action: Action) -> String {
        format!("{}_for_{}", action.default_hook(), self.name)
    }
}

/// Registration context handed to a tier's definition body.
///
/// Rules registered here land in the tier's own chains. When the tier is
/// not exclusive they are also appended to the model's default chain for
/// the same action, so plain validation enforces them too.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::{Errors, Rule};
/// use tiered_validation::tier::{TierOptions, TierRegistry};
///
/// struct Account {
///     number: Option<String>,
/// }
///
/// let mut registry = TierRegistry::<Account>::new("Account");
/// registry
///     .define_tier("pirate", TierOptions::new(), |tier| {
///         tier.validate_on_create(Rule::new(|a: &Account, errors: &mut Errors| {
///             if a.number.as_deref().map_or(true, |n| !n.starts_with("1234")) {
///                 errors.add("number", "is invalid");
///             }
///         }));
///     })
///     .unwrap();
/// ```
pub struct TierScope<'a, R> {
    tier: &'a str,
    exclusive: bool,
    own: &'a mut ActionChains<R>,
    defaults: &'a mut ActionChains<R>,
}

impl<'a, R> TierScope<'a, R> {
    pub(crate) fn new(
        tier: &'a str,
        exclusive: bool,
        own: &'a mut ActionChains<R>,
        defaults: &'a mut ActionChains<R>,
    ) -> Self {
        Self {
            tier,
            exclusive,
            own,
            defaults,
        }
    }

    /// Name of the tier being defined.
    pub fn tier(&self) -> &str {
        self.tier
    }

    /// Register `rule` for `action`.
    pub fn on(&mut self, action: Action, rule: Rule<R>) -> &mut Self {
        if !self.exclusive {
            self.defaults.get_mut(action).push(rule.clone());
        }
        self.own.get_mut(action).push(rule);
        self
    }

    /// Register a rule that runs on every evaluation of the tier.
    pub fn validate(&mut self, rule: Rule<R>) -> &mut Self {
        self.on(Action::Save, rule)
    }

    /// Register a rule that runs only for new records.
    pub fn validate_on_create(&mut self, rule: Rule<R>) -> &mut Self {
        self.on(Action::Create, rule)
    }

    /// Register a rule that runs only for persisted records.
    pub fn validate_on_update(&mut self, rule: Rule<R>) -> &mut Self {
        self.on(Action::Update, rule)
    }
}
