use isls_conf::RuleOption;
use serde::Deserialize;

use crate::Event;
use crate::Finding;
use crate::Rule;
use crate::RuleConfigError;

/// Which line a `max-length` finding is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineAnchor {
    /// The line of the offending event, like every other rule.
    #[default]
    Event,
    /// One line above the event. Matches older linter output.
    Previous,
}

#[derive(Debug, Deserialize)]
struct MaxLengthOptions {
    max: u32,
    #[serde(default)]
    line: LineAnchor,
}

/// Reports every event whose column is past the configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxLength {
    max: u32,
    anchor: LineAnchor,
}

impl MaxLength {
    pub const ID: &'static str = "max-length";

    #[must_use]
    pub fn new(max: u32, anchor: LineAnchor) -> Self {
        Self { max, anchor }
    }

    /// Accepts a positive integer, or `{"max": n, "line": "event" | "previous"}`.
    ///
    /// Returns `Ok(None)` for options that enable the rule without a limit.
    pub fn from_option(option: &RuleOption) -> Result<Option<Self>, RuleConfigError> {
        if let Some(max) = option.as_positive_int() {
            return Ok(Some(Self::new(max, LineAnchor::default())));
        }

        let Some(object) = option.as_object() else {
            tracing::debug!("max-length enabled without a limit, skipping");
            return Ok(None);
        };

        let options = MaxLengthOptions::deserialize(serde_json::Value::Object(object.clone()))
            .map_err(|err| RuleConfigError::Option {
                rule: Self::ID,
                message: err.to_string(),
            })?;

        if options.max == 0 {
            return Err(RuleConfigError::Option {
                rule: Self::ID,
                message: "'max' must be a positive integer".to_string(),
            });
        }

        Ok(Some(Self::new(options.max, options.line)))
    }

    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub fn anchor(&self) -> LineAnchor {
        self.anchor
    }
}

impl Rule for MaxLength {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn check(&self, event: &Event) -> Vec<Finding> {
        if event.col() <= self.max {
            return Vec::new();
        }

        let line = match self.anchor {
            LineAnchor::Event => event.line(),
            LineAnchor::Previous => event.line().saturating_sub(1),
        };

        let max = self.max;
        vec![Finding::error(
            Self::ID,
            format!("Line exceeds the maximum length of {max} characters."),
            line,
            event.col(),
            event.raw(),
        )]
    }
}
