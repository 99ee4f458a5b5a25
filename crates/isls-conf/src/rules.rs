//! Rule configuration: which rules run and with what options.
//!
//! A [`RuleConfig`] maps rule ids to a [`RuleOption`]. The same shape is used
//! by `.htmlhintrc` files on disk and by the editor-level `rules` table in
//! [`Settings`](crate::Settings). Options are kept loosely typed here and
//! interpreted by each rule when it is built.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::strip_comments;
use crate::ConfigError;

/// Rules enabled when no override says otherwise.
const DEFAULT_RULES: &[(&str, bool)] = &[
    ("tags-check", true),
    ("attr-no-duplication", true),
    ("max-length", false),
];

/// The value a configuration assigns to one rule id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleOption {
    Bool(bool),
    Number(Number),
    Object(Map<String, Value>),
    Other(Value),
}

impl RuleOption {
    /// Whether the option turns its rule on at all.
    ///
    /// Rules decide for themselves what a number or an object means; this
    /// only answers the `false` / `0` / `null` question.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Bool(enabled) => *enabled,
            RuleOption::Number(number) => number.as_f64().is_some_and(|n| n > 0.0),
            RuleOption::Object(_) => true,
            RuleOption::Other(value) => !value.is_null(),
        }
    }

    /// The option as a positive integer, if it is one.
    #[must_use]
    pub fn as_positive_int(&self) -> Option<u32> {
        match self {
            RuleOption::Number(number) => number
                .as_u64()
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            RuleOption::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for RuleOption {
    fn from(value: bool) -> Self {
        RuleOption::Bool(value)
    }
}

impl From<Value> for RuleOption {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => RuleOption::Bool(b),
            Value::Number(n) => RuleOption::Number(n),
            Value::Object(map) => RuleOption::Object(map),
            other => RuleOption::Other(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RuleConfig(BTreeMap<String, RuleOption>);

impl RuleConfig {
    #[must_use]
    pub fn new(rules: BTreeMap<String, RuleOption>) -> Self {
        Self(rules)
    }

    /// The fixed default rule set every resolution starts from.
    #[must_use]
    pub fn defaults() -> Self {
        Self(
            DEFAULT_RULES
                .iter()
                .map(|(id, enabled)| ((*id).to_string(), RuleOption::Bool(*enabled)))
                .collect(),
        )
    }

    /// Parse a rule configuration file, tolerating comments.
    pub fn from_jsonc(text: &str) -> Result<Self, ConfigError> {
        let stripped = strip_comments(text);
        Ok(serde_json::from_str(&stripped)?)
    }

    #[must_use]
    pub fn get(&self, rule_id: &str) -> Option<&RuleOption> {
        self.0.get(rule_id)
    }

    pub fn insert(&mut self, rule_id: impl Into<String>, option: impl Into<RuleOption>) {
        self.0.insert(rule_id.into(), option.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuleOption)> {
        self.0.iter()
    }

    /// Whether `rule_id` is present and enabled.
    #[must_use]
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        self.get(rule_id).is_some_and(RuleOption::is_enabled)
    }

    /// Shallow overlay: every key in `overrides` replaces the key here.
    #[must_use]
    pub fn overlay(&self, overrides: &RuleConfig) -> RuleConfig {
        let mut merged = self.0.clone();
        merged.extend(
            overrides
                .0
                .iter()
                .map(|(id, option)| (id.clone(), option.clone())),
        );
        Self(merged)
    }
}

impl FromIterator<(String, RuleOption)> for RuleConfig {
    fn from_iter<T: IntoIterator<Item = (String, RuleOption)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    mod options {
        use super::*;

        #[test]
        fn test_is_enabled() {
            assert!(RuleOption::Bool(true).is_enabled());
            assert!(!RuleOption::Bool(false).is_enabled());
            assert!(RuleOption::from(json!(120)).is_enabled());
            assert!(!RuleOption::from(json!(0)).is_enabled());
            assert!(RuleOption::from(json!({})).is_enabled());
            assert!(!RuleOption::from(json!(null)).is_enabled());
        }

        #[test]
        fn test_as_positive_int() {
            assert_eq!(RuleOption::from(json!(120)).as_positive_int(), Some(120));
            assert_eq!(RuleOption::from(json!(0)).as_positive_int(), None);
            assert_eq!(RuleOption::from(json!(-4)).as_positive_int(), None);
            assert_eq!(RuleOption::from(json!(1.5)).as_positive_int(), None);
            assert_eq!(RuleOption::Bool(true).as_positive_int(), None);
        }

        #[test]
        fn test_untagged_deserialize() {
            let config: RuleConfig = serde_json::from_str(
                r#"{"a": true, "b": 80, "c": {"img": {}}, "d": "yes"}"#,
            )
            .unwrap();
            assert_eq!(config.get("a"), Some(&RuleOption::Bool(true)));
            assert!(matches!(config.get("b"), Some(RuleOption::Number(_))));
            assert!(matches!(config.get("c"), Some(RuleOption::Object(_))));
            assert_eq!(config.get("d"), Some(&RuleOption::Other(json!("yes"))));
        }
    }

    mod overlay {
        use super::*;

        #[test]
        fn test_defaults() {
            let defaults = RuleConfig::defaults();
            assert!(defaults.is_enabled("tags-check"));
            assert!(defaults.is_enabled("attr-no-duplication"));
            assert!(!defaults.is_enabled("max-length"));
        }

        #[test]
        fn test_override_replaces_whole_key() {
            let mut overrides = RuleConfig::default();
            overrides.insert("tags-check", json!({"isprint": {"selfclosing": true}}));
            overrides.insert("max-length", json!(140));

            let merged = RuleConfig::defaults().overlay(&overrides);

            assert_eq!(merged.get("tags-check"), overrides.get("tags-check"));
            assert_eq!(merged.get("max-length"), overrides.get("max-length"));
            assert_eq!(
                merged.get("attr-no-duplication"),
                Some(&RuleOption::Bool(true))
            );
        }

        #[test]
        fn test_unknown_keys_preserved() {
            let mut overrides = RuleConfig::default();
            overrides.insert("doctype-first", false);
            let merged = RuleConfig::defaults().overlay(&overrides);
            assert_eq!(merged.get("doctype-first"), Some(&RuleOption::Bool(false)));
            assert_eq!(merged.iter().count(), 4);
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_from_jsonc_with_comments() {
            let text = r#"{
                // keep lines short
                "max-length": 100, /* and no grammar */ "tags-check": false
            }"#;
            let config = RuleConfig::from_jsonc(text).unwrap();
            let max_length = config.get("max-length").unwrap();
            assert_eq!(max_length.as_positive_int(), Some(100));
            assert!(!config.is_enabled("tags-check"));
        }

        #[test]
        fn test_from_jsonc_rejects_non_object() {
            assert!(matches!(RuleConfig::from_jsonc("[1, 2]"), Err(ConfigError::Json(_))));
            assert!(matches!(
                RuleConfig::from_jsonc("{ \"tags-check\": "),
                Err(ConfigError::Json(_))
            ));
        }
    }
}
