use std::ops::Range;

use annotate_snippets::AnnotationKind;
use annotate_snippets::Level;
use annotate_snippets::Renderer;
use annotate_snippets::Snippet;
use isls_templates::Finding;

use crate::diagnostics::source_line;
use crate::diagnostics::token_chars;

/// Renders findings as annotated source snippets using `annotate-snippets`.
///
/// - **Plain**: no ANSI colors, for tests and piped output
/// - **Styled**: ANSI colors, for terminal display
#[derive(Debug)]
pub struct DiagnosticRenderer {
    renderer: Renderer,
}

impl DiagnosticRenderer {
    #[must_use]
    pub fn plain() -> Self {
        Self {
            renderer: Renderer::plain(),
        }
    }

    #[must_use]
    pub fn styled() -> Self {
        Self {
            renderer: Renderer::styled(),
        }
    }

    /// Render one finding against the document it was reported for.
    #[must_use]
    pub fn render(&self, source: &str, path: &str, finding: &Finding) -> String {
        let snippet = Snippet::source(source)
            .path(path)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(byte_span(source, finding)));

        let title = Level::ERROR
            .primary_title(finding.message.as_str())
            .id(finding.rule_id)
            .element(snippet);

        let report = &[title];
        self.renderer.render(report)
    }
}

/// Byte range of the token a finding points at. Falls back to an empty span
/// at the end of the source when the position is out of range.
fn byte_span(source: &str, finding: &Finding) -> Range<usize> {
    let Some(line) = source_line(source, finding.line) else {
        return source.len()..source.len();
    };

    let (start, end) = token_chars(line.text, finding.col);
    let byte_at = |chars: usize| {
        line.text
            .char_indices()
            .nth(chars)
            .map_or(line.text.len(), |(i, _)| i)
    };

    (line.offset + byte_at(start))..(line.offset + byte_at(end))
}
