use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// What went wrong (or looks suspicious) in a dedlee source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Nothing but blank lines and `#` comments.
    #[error("source is empty: no lines left after removing blanks and comments")]
    EmptySource,
    /// An `o.`/`c.` line opens a quoted inventory name and never closes it.
    #[error("unterminated inventory name for `{0}`")]
    UnterminatedInventoryName(String),
    /// Leading whitespace mixes tabs and spaces.
    #[error("indentation mixes tabs and spaces")]
    MixedIndentation,
}

/// Parse errors and warnings with source location information.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn error(kind: ParseErrorKind, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            kind,
            span,
            file_id,
            severity: Severity::Error,
            notes: Vec::new(),
        }
    }

    pub fn warning(kind: ParseErrorKind, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            kind,
            span,
            file_id,
            severity: Severity::Warning,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(self.kind.to_string())
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_comes_from_kind() {
        let err = ParseError::warning(
            ParseErrorKind::UnterminatedInventoryName("o.lamp".into()),
            3..10,
            0,
        );
        assert_eq!(err.to_string(), "unterminated inventory name for `o.lamp`");
        assert!(err.is_warning());
    }

    #[test]
    fn diagnostic_keeps_notes_and_severity() {
        let err = ParseError::error(ParseErrorKind::EmptySource, 0..0, 7)
            .with_note("every line was blank or a comment");
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.notes, vec!["every line was blank or a comment"]);
        assert_eq!(diagnostic.labels[0].file_id, 7);
    }
}
