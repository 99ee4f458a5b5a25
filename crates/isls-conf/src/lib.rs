pub mod fs;
mod jsonc;
pub mod resolver;
pub mod rules;
pub mod settings;

use thiserror::Error;

pub use crate::fs::FileSystem;
pub use crate::fs::InMemoryFileSystem;
pub use crate::fs::OsFileSystem;
pub use crate::jsonc::strip_comments;
pub use crate::resolver::CachedOverride;
pub use crate::resolver::ConfigResolver;
pub use crate::resolver::CONFIG_FILE_NAME;
pub use crate::rules::RuleConfig;
pub use crate::rules::RuleOption;
pub use crate::settings::Settings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] config::ConfigError),
    #[error("Failed to parse rule configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
