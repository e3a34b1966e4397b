mod block;
pub mod error;

pub use error::{ParseError, ParseErrorKind};

use crate::Story;
use crate::options::CompileOptions;
use crate::parser::block::BlockParser;
use crate::source::normalize;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
    options: CompileOptions,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser {
            source,
            file_id,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the dedlee source into a story tree. Links are left as
    /// placeholders; see [`crate::links`].
    pub fn parse(&self) -> Result<Story, Vec<ParseError>> {
        let normalized = normalize(&self.source, self.file_id).map_err(|e| vec![e])?;
        let (nodes, block_warnings) =
            BlockParser::new(&normalized.lines, &self.options, self.file_id).parse();

        let mut warnings = normalized.warnings;
        warnings.extend(block_warnings);
        warnings.sort_by_key(|w| w.span.start);

        Ok(Story {
            nodes,
            warnings,
            source_id: self.file_id,
        })
    }
}
