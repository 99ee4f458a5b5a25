/// Severity of a finding. The grammar engine only reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Severity {
    Error,
}

/// One rule violation, positioned at a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub line: u32,
    pub col: u32,
    pub rule_id: &'static str,
    pub raw: String,
}

impl Finding {
    #[must_use]
    pub fn error(
        rule_id: &'static str,
        message: impl Into<String>,
        line: u32,
        col: u32,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line,
            col,
            rule_id,
            raw: raw.into(),
        }
    }
}
