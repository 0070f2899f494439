//! Ordered, duplicate-free rule sequences.

use super::errors::Errors;
use super::rule::{Rule, RuleError, RuleId};
use std::collections::HashSet;

/// An ordered sequence of rules in which every rule appears once.
///
/// Appending a rule that is already present is a no-op, so merging chains
/// keeps the first-seen position of each rule and the result is
/// deterministic for identical inputs.
///
/// # Example
///
/// ```rust
/// use tiered_validation::core::{Errors, Rule, RuleChain};
///
/// let shared: Rule<()> = Rule::new(|_, errors: &mut Errors| errors.add_to_base("shared"));
/// let own: Rule<()> = Rule::new(|_, _: &mut Errors| {});
///
/// let mut first = RuleChain::new();
/// first.push(own.clone());
/// first.push(shared.clone());
///
/// let mut second = RuleChain::new();
/// second.push(shared.clone());
///
/// let merged = first.union(&second);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged.ids(), vec![own.id(), shared.id()]);
/// ```
pub struct RuleChain<R> {
    rules: Vec<Rule<R>>,
    seen: HashSet<RuleId>,
}

impl<R> RuleChain<R> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append `rule` unless a rule with the same identity is already present.
    ///
    /// Returns whether the rule was added.
    pub fn push(&mut self, rule: Rule<R>) -> bool {
        if !self.seen.insert(rule.id()) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Append every rule of `other` not already present, in `other`'s order.
    pub fn extend_from(&mut self, other: &RuleChain<R>) {
        for rule in &other.rules {
            self.push(rule.clone());
        }
    }

    /// A new chain holding `self` followed by the unseen rules of `other`.
    pub fn union(&self, other: &RuleChain<R>) -> RuleChain<R> {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    pub fn contains(&self, id: RuleId) -> bool {
        self.seen.contains(&id)
    }

    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(Rule::id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule<R>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order against `record`.
    ///
    /// Stops at the first rule that fails to run; findings recorded before
    /// that point stay in `errors`.
    pub fn run(&self, record: &R, errors: &mut Errors) -> Result<(), RuleError> {
        for rule in &self.rules {
            rule.check(record, errors)?;
        }
        Ok(())
    }
}

impl<R> Default for RuleChain<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for RuleChain<R> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            seen: self.seen.clone(),
        }
    }
}

impl<R> std::fmt::Debug for RuleChain<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

impl<R> FromIterator<Rule<R>> for RuleChain<R> {
    fn from_iter<I: IntoIterator<Item = Rule<R>>>(iter: I) -> Self {
        let mut chain = RuleChain::new();
        for rule in iter {
            chain.push(rule);
        }
        chain
    }
}

impl<'a, R> IntoIterator for &'a RuleChain<R> {
    type Item = &'a Rule<R>;
    type IntoIter = std::slice::Iter<'a, Rule<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
