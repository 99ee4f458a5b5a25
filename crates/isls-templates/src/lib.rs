//! ISML tag-grammar validation.
//!
//! This crate checks the tag events produced by an external markup tokenizer
//! against a table of per-tag grammars and a couple of companion rules.
//!
//! ## Architecture
//!
//! 1. **Events**: the tokenizer hands over [`Event`]s in source order
//! 2. **Rules**: each enabled [`Rule`] turns one event into zero or more [`Finding`]s
//! 3. **Validation**: the [`Validator`] builds rules from a resolved
//!    [`RuleConfig`](isls_conf::RuleConfig) and drives them over the stream
//!
//! ## Key Components
//!
//! - [`tagspecs`]: tag grammars and the builtin ISML table
//! - [`matcher`]: evaluation of a single attribute requirement
//! - [`rules`]: `tags-check`, `attr-no-duplication` and `max-length`
//!
//! ## Example
//!
//! ```
//! use isls_conf::RuleConfig;
//! use isls_templates::{Event, TagOccurrence, Validator};
//!
//! let validator = Validator::from_config(&RuleConfig::defaults()).unwrap();
//! let img = TagOccurrence::new("img", 1, 1).with_attr("src", "logo.png");
//! let findings = validator.validate([Event::TagStart(img)]);
//!
//! assert_eq!(findings[0].message, "The <img> tag must have attr 'alt'.");
//! ```

mod error;
mod events;
mod finding;
pub mod matcher;
pub mod rules;
pub mod tagspecs;
mod validation;

pub use error::RuleConfigError;
pub use events::Attribute;
pub use events::Chunk;
pub use events::Event;
pub use events::TagEnd;
pub use events::TagOccurrence;
pub use finding::Finding;
pub use finding::Severity;
pub use rules::Rule;
pub use tagspecs::AttributeRequirement;
pub use tagspecs::ClosingPolicy;
pub use tagspecs::TagSpec;
pub use tagspecs::TagSpecs;
pub use validation::Validator;
