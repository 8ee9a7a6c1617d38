//! Rule registry
//!
//! Keeps rules in registration order, which is the order violations appear
//! in a report. Registering a name twice replaces the earlier rule in its
//! original slot, so reports stay stable when a built-in is overridden.

use crate::rule::Rule;
use crate::rules;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Ordered set of named rules
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    by_name: FxHashMap<String, usize>,
}

impl RuleRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the six built-in ledger rules
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for rule in rules::builtin_rules() {
            registry.register_arc(rule);
        }
        registry
    }

    /// Register a rule; a rule with the same name is replaced
    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.register_arc(Arc::new(rule));
    }

    /// Register a shared rule; a rule with the same name is replaced
    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) {
        match self.by_name.get(rule.name()) {
            Some(&slot) => self.rules[slot] = rule,
            None => {
                self.by_name.insert(rule.name().to_string(), self.rules.len());
                self.rules.push(rule);
            }
        }
    }

    /// Rule by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.by_name.get(name).map(|&slot| &self.rules[slot])
    }

    /// All rules in registration order
    pub fn all_rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Rule names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
