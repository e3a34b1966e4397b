pub mod links;
pub mod markup;
pub mod options;
pub mod parser;
pub mod rule;
pub mod source;

use std::fmt;

use crate::markup::{Element, ElementKind, Elements, InlineTag, Node};
use crate::options::CompileOptions;
use crate::parser::{ParseError, Parser};

/// A parsed dedlee story.
#[derive(Debug, Clone)]
pub struct Story {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
    /// Non-fatal diagnostics, ordered by position.
    pub warnings: Vec<ParseError>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Story {
    pub fn title(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            Node::Inline {
                tag: InlineTag::Title,
                content,
                ..
            } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Every element, depth first.
    pub fn elements(&self) -> Elements<'_> {
        Elements::new(&self.nodes)
    }

    /// The page marked `(first)`, if any.
    pub fn first_page(&self) -> Option<&Element> {
        self.elements().find(|e| e.is_first_page())
    }

    pub fn find(&self, kind: ElementKind, id: &str) -> Option<&Element> {
        self.elements().find(|e| e.kind == kind && e.id() == Some(id))
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        markup::write_nodes(f, &self.nodes)
    }
}

/// Parse, rewrite links and return the story tree.
pub fn compile_story(
    source: &str,
    file_id: usize,
    options: CompileOptions,
) -> Result<Story, Vec<ParseError>> {
    let mut story = Parser::new(source.to_string(), file_id)
        .with_options(options)
        .parse()?;
    if options.rewrite_links {
        let rewritten = links::rewrite_story(&mut story, options.link_capture);
        log::debug!("rewrote links in {} line(s)", rewritten);
    }
    Ok(story)
}

/// Compile dedlee source to story markup with default options.
pub fn compile(source: &str) -> Result<String, Vec<ParseError>> {
    compile_story(source, 0, CompileOptions::default()).map(|story| story.to_string())
}
