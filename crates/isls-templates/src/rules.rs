//! Validation rules.
//!
//! A rule sees every event in source order and returns the findings that
//! event produces. Rules hold no per-document state, so one instance can be
//! reused across documents.

mod attr_no_duplication;
mod max_length;
mod tags_check;

pub use attr_no_duplication::AttrNoDuplication;
pub use max_length::LineAnchor;
pub use max_length::MaxLength;
pub use tags_check::TagsCheck;

use crate::Event;
use crate::Finding;

pub trait Rule: Send + Sync {
    /// Stable identifier, also used as the diagnostic code.
    fn id(&self) -> &'static str;

    fn check(&self, event: &Event) -> Vec<Finding>;
}
