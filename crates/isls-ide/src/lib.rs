//! Editor-facing output for ISML findings.
//!
//! Findings from the validation engine carry 1-based line and column
//! positions. This crate turns them into LSP diagnostics with 0-based,
//! UTF-16 ranges, and into annotated snippets for terminal output.

pub mod diagnostics;
pub mod render;

pub use diagnostics::collect_diagnostics;
pub use diagnostics::finding_range;
pub use render::DiagnosticRenderer;

/// Value of the `source` field on every published diagnostic.
pub const SOURCE_NAME: &str = "isml";
