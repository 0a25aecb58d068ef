#![forbid(unsafe_code)]

//! Built-in lint rules embedded at compile time
//!
//! The rule definitions live in `builtin-lints/` and are compiled into the
//! binary with `include_str!`, so `se lint` needs no files besides the
//! ebook itself.

use super::regex_rule::RegexRule;
use crate::error::RuleError;

/// Embedded built-in regex rule files
const BUILTIN_REGEX_RULES: &[(&str, &str)] = &[
    (
        "no-css-important",
        include_str!("../../builtin-lints/no-css-important.toml"),
    ),
    (
        "no-double-br",
        include_str!("../../builtin-lints/no-double-br.toml"),
    ),
    (
        "no-empty-elements",
        include_str!("../../builtin-lints/no-empty-elements.toml"),
    ),
    (
        "no-numeric-entities",
        include_str!("../../builtin-lints/no-numeric-entities.toml"),
    ),
    (
        "no-straight-quotes",
        include_str!("../../builtin-lints/no-straight-quotes.toml"),
    ),
    (
        "no-style-attribute",
        include_str!("../../builtin-lints/no-style-attribute.toml"),
    ),
    (
        "no-three-periods",
        include_str!("../../builtin-lints/no-three-periods.toml"),
    ),
    (
        "no-todo-markers",
        include_str!("../../builtin-lints/no-todo-markers.toml"),
    ),
];

/// Load all built-in regex rules from embedded resources
pub fn load_builtin_regex_rules() -> Result<Vec<RegexRule>, RuleError> {
    BUILTIN_REGEX_RULES
        .iter()
        .map(|(name, content)| {
            RegexRule::from_toml(content).map_err(|e| {
                RuleError::InvalidDefinition(format!("Built-in rule '{}': {}", name, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::rule::Rule;

    #[test]
    fn test_builtin_rules_load() {
        let rules = load_builtin_regex_rules().unwrap();
        assert_eq!(rules.len(), BUILTIN_REGEX_RULES.len());
    }

    #[test]
    fn test_builtin_ids_match_file_names() {
        let rules = load_builtin_regex_rules().unwrap();
        for (rule, (name, _)) in rules.iter().zip(BUILTIN_REGEX_RULES) {
            assert_eq!(rule.id().as_str(), *name);
        }
    }
}
