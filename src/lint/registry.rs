#![forbid(unsafe_code)]

//! Rule registry
//!
//! Holds the rules for one lint run: the built-in catalog minus anything
//! listed in `[lint] ignore`, plus the `[[lint.rules]]` from se.toml.

use super::builtin::load_builtin_regex_rules;
use super::regex_rule::RegexRule;
use super::rule::Rule;
use crate::config::LintConfig;
use crate::error::RuleError;
use crate::types::RuleId;
use std::collections::HashSet;

/// Ordered collection of enabled rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    ignored: HashSet<RuleId>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            ignored: HashSet::new(),
        }
    }

    /// Build the registry for a lint configuration
    pub fn build_from_config(config: &LintConfig) -> Result<Self, RuleError> {
        let mut registry = Self::new();
        registry.ignored = config.ignore.iter().cloned().collect();

        for rule in load_builtin_regex_rules()? {
            registry.add(Box::new(rule))?;
        }
        for custom in &config.rules {
            registry.add(Box::new(RegexRule::from_custom(custom)?))?;
        }

        Ok(registry)
    }

    /// Add a rule unless it is ignored
    ///
    /// Fails when a rule with the same ID is already registered.
    pub fn add(&mut self, rule: Box<dyn Rule>) -> Result<(), RuleError> {
        if self.is_ignored(rule.id()) {
            return Ok(());
        }
        if self.rules.iter().any(|existing| existing.id() == rule.id()) {
            return Err(RuleError::InvalidDefinition(format!(
                "Duplicate rule ID '{}'",
                rule.id()
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Whether messages with this ID are suppressed
    pub fn is_ignored(&self, id: &RuleId) -> bool {
        self.ignored.contains(id)
    }

    pub fn iter_rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomRule;
    use crate::types::Severity;

    fn custom(id: &str) -> CustomRule {
        CustomRule {
            id: RuleId::new(id).unwrap(),
            description: "Archaic pronoun".to_string(),
            severity: Severity::ManualReview,
            pattern: r"\bthee\b".to_string(),
            include: vec![],
            exclude: vec![],
        }
    }

    #[test]
    fn test_builtins_loaded() {
        let registry = RuleRegistry::build_from_config(&LintConfig::default()).unwrap();
        assert!(!registry.is_empty());
        assert!(
            registry
                .iter_rules()
                .any(|rule| rule.id().as_str() == "no-style-attribute")
        );
    }

    #[test]
    fn test_ignored_rules_skipped() {
        let all = RuleRegistry::build_from_config(&LintConfig::default()).unwrap();
        let config = LintConfig {
            ignore: vec![RuleId::new("no-style-attribute").unwrap()],
            rules: vec![],
        };
        let registry = RuleRegistry::build_from_config(&config).unwrap();

        assert_eq!(registry.len(), all.len() - 1);
        assert!(
            !registry
                .iter_rules()
                .any(|rule| rule.id().as_str() == "no-style-attribute")
        );
    }

    #[test]
    fn test_custom_rules_added() {
        let config = LintConfig {
            ignore: vec![],
            rules: vec![custom("no-thee")],
        };
        let registry = RuleRegistry::build_from_config(&config).unwrap();
        assert!(registry.iter_rules().any(|rule| rule.id().as_str() == "no-thee"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let config = LintConfig {
            ignore: vec![],
            rules: vec![custom("no-style-attribute")],
        };
        assert!(RuleRegistry::build_from_config(&config).is_err());
    }
}
