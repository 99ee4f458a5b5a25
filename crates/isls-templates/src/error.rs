use thiserror::Error;

/// A rule option that cannot be turned into a working rule.
#[derive(Debug, Error)]
pub enum RuleConfigError {
    #[error("Invalid tag spec for <{tag}>: {source}")]
    TagSpec {
        tag: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid attribute requirement for <{tag}>: {message}")]
    Requirement { tag: String, message: String },

    #[error("Invalid option for rule '{rule}': {message}")]
    Option { rule: &'static str, message: String },
}
