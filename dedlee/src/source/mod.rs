use std::ops::Range;

use crate::parser::error::{ParseError, ParseErrorKind};

/// A single source line after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Position in the normalized line sequence (blanks and comments excluded).
    pub index: usize,
    /// Leading whitespace characters, relative to the least indented line.
    pub indent: usize,
    /// Text with the common indentation removed and trailing whitespace trimmed.
    pub text: String,
    /// Byte span of the raw line in the original source.
    pub span: Range<usize>,
}

impl Line {
    pub fn trimmed(&self) -> &str {
        self.text.trim_start()
    }
}

/// Result of normalization: the lines plus any warnings noticed along the way.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub lines: Vec<Line>,
    pub warnings: Vec<ParseError>,
}

/// Clean raw source into a sequence of [`Line`]s.
///
/// Blank lines and lines whose trimmed content starts with `#` are dropped
/// before indentation is measured, so they never influence block structure.
/// Every remaining line loses the smallest leading-whitespace width found in
/// the document; tabs and spaces both count as one column.
pub fn normalize(source: &str, file_id: usize) -> Result<Normalized, ParseError> {
    let mut kept: Vec<(&str, Range<usize>)> = Vec::new();
    let mut warnings = Vec::new();

    for (raw, span) in raw_lines(source) {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if mixes_tabs_and_spaces(raw) {
            warnings.push(ParseError::warning(
                ParseErrorKind::MixedIndentation,
                span.clone(),
                file_id,
            ));
        }
        kept.push((raw, span));
    }

    let Some(min_indent) = kept.iter().map(|(raw, _)| leading_width(raw)).min() else {
        return Err(ParseError::error(
            ParseErrorKind::EmptySource,
            0..source.len(),
            file_id,
        )
        .with_note("every line is blank or a `#` comment"));
    };

    let lines = kept
        .into_iter()
        .enumerate()
        .map(|(index, (raw, span))| {
            let text = strip_columns(raw, min_indent).trim_end().to_string();
            Line {
                index,
                indent: leading_width(&text),
                text,
                span,
            }
        })
        .collect();

    Ok(Normalized { lines, warnings })
}

/// Number of leading whitespace characters.
pub fn leading_width(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

/// Split on `\r` and `\n`, keeping the byte span of each piece. A leading
/// byte-order mark is skipped.
fn raw_lines(source: &str) -> Vec<(&str, Range<usize>)> {
    let mut out = Vec::new();
    let mut start = if source.starts_with(BOM) { BOM.len_utf8() } else { 0 };
    for (pos, ch) in source.char_indices().skip_while(move |&(pos, _)| pos < start) {
        if ch == '\n' || ch == '\r' {
            if pos > start {
                out.push((&source[start..pos], start..pos));
            }
            start = pos + ch.len_utf8();
        }
    }
    if start < source.len() {
        out.push((&source[start..], start..source.len()));
    }
    out
}

const BOM: char = '\u{feff}';

/// Drop the first `columns` characters. Callers guarantee they are whitespace.
fn strip_columns(text: &str, columns: usize) -> &str {
    match text.char_indices().nth(columns) {
        Some((offset, _)) => &text[offset..],
        None => "",
    }
}

fn mixes_tabs_and_spaces(raw: &str) -> bool {
    let prefix: Vec<char> = raw.chars().take_while(|c| c.is_whitespace()).collect();
    prefix.contains(&'\t') && prefix.contains(&' ')
}
