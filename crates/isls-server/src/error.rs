use std::any::Any;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use isls_templates::RuleConfigError;
use thiserror::Error;

/// Validation of one document failed. Other documents are unaffected.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    #[error("Invalid rule configuration for {path}: {source}")]
    Config {
        path: Utf8PathBuf,
        #[source]
        source: RuleConfigError,
    },

    #[error("{message}")]
    Panicked { path: Utf8PathBuf, message: String },
}

impl ValidationFailure {
    /// Normalize a panic payload caught while validating `path`.
    pub(crate) fn from_panic(path: &Utf8Path, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            format!("unknown error occurred while validating file: {path}")
        };

        Self::Panicked {
            path: path.to_owned(),
            message,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Config { path, .. } | Self::Panicked { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_payloads_kept() {
        let path = Utf8Path::new("/p/a.isml");

        let failure = ValidationFailure::from_panic(path, &"rule exploded");
        assert_eq!(failure.to_string(), "rule exploded");

        let failure = ValidationFailure::from_panic(path, &String::from("owned message"));
        assert_eq!(failure.to_string(), "owned message");
    }

    #[test]
    fn test_other_payloads_normalized() {
        let path = Utf8Path::new("/p/a.isml");
        let failure = ValidationFailure::from_panic(path, &42_u32);

        assert_eq!(
            failure.to_string(),
            "unknown error occurred while validating file: /p/a.isml"
        );
        assert_eq!(failure.path(), path);
    }
}
