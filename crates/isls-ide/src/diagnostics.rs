use isls_templates::Finding;
use tower_lsp_server::ls_types;

const RULES_BASE_URL: &str = "https://htmlhint.com/rules/";

fn rule_url(rule_id: &str) -> Option<ls_types::Uri> {
    format!("{RULES_BASE_URL}{rule_id}/").parse().ok()
}

/// One line of a document, with the byte offset it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// The 1-based `line` of `text`, without its line terminator.
pub(crate) fn source_line(text: &str, line: u32) -> Option<SourceLine<'_>> {
    let index = usize::try_from(line.checked_sub(1)?).ok()?;
    let mut offset = 0;

    for (i, raw) in text.split_inclusive('\n').enumerate() {
        if i == index {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            return Some(SourceLine { offset, text });
        }
        offset += raw.len();
    }

    None
}

/// Character bounds of the token starting at 1-based `col` on `line`.
///
/// The token ends at the first whitespace or `<` after its first character,
/// or at the end of the line.
pub(crate) fn token_chars(line: &str, col: u32) -> (usize, usize) {
    let start = usize::try_from(col.saturating_sub(1)).unwrap_or(usize::MAX);
    let end = line
        .chars()
        .enumerate()
        .skip(start.saturating_add(1))
        .find(|(_, ch)| ch.is_whitespace() || *ch == '<')
        .map_or_else(|| line.chars().count(), |(i, _)| i);

    (start, end.max(start))
}

fn utf16_column(line: &str, chars: usize) -> u32 {
    let mut units = 0usize;
    let mut seen = 0usize;
    for ch in line.chars().take(chars) {
        units += ch.len_utf16();
        seen += 1;
    }
    // positions past the end of the line count one unit per character
    units += chars - seen;
    u32::try_from(units).unwrap_or(u32::MAX)
}

/// Map a finding onto a 0-based LSP range within `text`.
///
/// A finding on a line that does not exist collapses to an empty range at
/// its reported position.
#[must_use]
pub fn finding_range(finding: &Finding, text: &str) -> ls_types::Range {
    let line = finding.line.saturating_sub(1);

    let Some(source) = source_line(text, finding.line) else {
        let col = finding.col.saturating_sub(1);
        let position = ls_types::Position::new(line, col);
        return ls_types::Range::new(position, position);
    };

    let (start, end) = token_chars(source.text, finding.col);
    ls_types::Range::new(
        ls_types::Position::new(line, utf16_column(source.text, start)),
        ls_types::Position::new(line, utf16_column(source.text, end)),
    )
}

fn to_diagnostic(finding: &Finding, text: &str) -> ls_types::Diagnostic {
    ls_types::Diagnostic {
        range: finding_range(finding, text),
        severity: Some(ls_types::DiagnosticSeverity::ERROR),
        code: Some(ls_types::NumberOrString::String(finding.rule_id.to_string())),
        code_description: rule_url(finding.rule_id).map(|href| ls_types::CodeDescription { href }),
        source: Some(crate::SOURCE_NAME.to_string()),
        message: finding.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Convert the findings for one document into LSP diagnostics, keeping
/// their order.
#[must_use]
pub fn collect_diagnostics(text: &str, findings: &[Finding]) -> Vec<ls_types::Diagnostic> {
    findings
        .iter()
        .map(|finding| to_diagnostic(finding, text))
        .collect()
}
