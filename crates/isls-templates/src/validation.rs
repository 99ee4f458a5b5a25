use std::borrow::Borrow;

use isls_conf::RuleConfig;

use crate::rules::AttrNoDuplication;
use crate::rules::MaxLength;
use crate::rules::TagsCheck;
use crate::Event;
use crate::Finding;
use crate::Rule;
use crate::RuleConfigError;

const KNOWN_RULES: [&str; 3] = [TagsCheck::ID, AttrNoDuplication::ID, MaxLength::ID];

/// The set of enabled rules for one resolved configuration.
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Build every enabled rule from `config`.
    ///
    /// Rules run in a fixed order (`tags-check`, `attr-no-duplication`,
    /// `max-length`) regardless of key order in the configuration.
    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleConfigError> {
        for (id, option) in config.iter() {
            if option.is_enabled() && !KNOWN_RULES.contains(&id.as_str()) {
                tracing::debug!("Ignoring unknown rule '{id}'");
            }
        }

        let mut rules: Vec<Box<dyn Rule>> = Vec::new();

        if let Some(option) = config.get(TagsCheck::ID).filter(|o| o.is_enabled()) {
            rules.push(Box::new(TagsCheck::from_option(option)?));
        }
        if config.is_enabled(AttrNoDuplication::ID) {
            rules.push(Box::new(AttrNoDuplication));
        }
        if let Some(option) = config.get(MaxLength::ID).filter(|o| o.is_enabled()) {
            if let Some(rule) = MaxLength::from_option(option)? {
                rules.push(Box::new(rule));
            }
        }

        tracing::debug!("Built validator with rules {:?}", Self::ids(&rules));
        Ok(Self::new(rules))
    }

    #[must_use]
    pub fn rule_ids(&self) -> Vec<&'static str> {
        Self::ids(&self.rules)
    }

    fn ids(rules: &[Box<dyn Rule>]) -> Vec<&'static str> {
        rules.iter().map(|rule| rule.id()).collect()
    }

    /// Feed `events` to every rule in source order.
    ///
    /// Findings come back ordered by event, then by rule.
    pub fn validate<I>(&self, events: I) -> Vec<Finding>
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        let mut findings = Vec::new();
        for event in events {
            let event = event.borrow();
            for rule in &self.rules {
                findings.extend(rule.check(event));
            }
        }
        findings
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rule_ids())
            .finish()
    }
}
