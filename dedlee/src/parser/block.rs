use std::ops::Range;

use crate::markup::{Attribute, Element, ElementKind, Node};
use crate::options::CompileOptions;
use crate::parser::error::ParseError;
use crate::rule::{LineContext, Opening, RuleKind};
use crate::source::Line;

/// Block parser turning indentation into element nesting.
///
/// A block consumes lines for as long as they are at least as indented as
/// its first line; a multi-line rule's children are the following lines that
/// are strictly deeper than its trigger. Open blocks live on an explicit
/// [`Frame`] stack rather than the call stack, so nesting depth is bounded
/// only by memory.
pub(crate) struct BlockParser<'a> {
    lines: &'a [Line],
    pos: usize,
    options: &'a CompileOptions,
    file_id: usize,
    warnings: Vec<ParseError>,
}

/// One open block.
struct Frame {
    enclosing: Option<RuleKind>,
    indent: usize,
    relative: usize,
    nodes: Vec<Node>,
    /// The element these nodes belong to; `None` for a top-level block.
    owner: Option<Owner>,
}

/// An element whose children are still being collected.
struct Owner {
    kind: ElementKind,
    attributes: Vec<Attribute>,
    close_tag: &'static str,
    span: Range<usize>,
}

impl Owner {
    fn close(self, children: Vec<Node>) -> Node {
        Node::Element(Element {
            kind: self.kind,
            attributes: self.attributes,
            children,
            close_tag: self.close_tag,
            span: self.span,
        })
    }
}

impl Frame {
    fn new(enclosing: Option<RuleKind>, indent: usize, owner: Option<Owner>) -> Self {
        Frame {
            enclosing,
            indent,
            relative: 0,
            nodes: Vec::new(),
            owner,
        }
    }
}

impl<'a> BlockParser<'a> {
    pub(crate) fn new(lines: &'a [Line], options: &'a CompileOptions, file_id: usize) -> Self {
        BlockParser {
            lines,
            pos: 0,
            options,
            file_id,
            warnings: Vec::new(),
        }
    }

    /// Parse every line, returning the top-level nodes and any warnings.
    pub(crate) fn parse(mut self) -> (Vec<Node>, Vec<ParseError>) {
        let mut nodes = Vec::new();
        // A top-level block ends early if a later line is shallower than the
        // first one; pick up again at that line.
        while self.pos < self.lines.len() {
            nodes.extend(self.parse_block());
        }
        (nodes, self.warnings)
    }

    /// Parse one top-level block and everything nested in it.
    fn parse_block(&mut self) -> Vec<Node> {
        let lines = self.lines;
        let Some(first) = lines.get(self.pos) else {
            return Vec::new();
        };
        log::trace!("enter top-level block at line {} (indent {})", self.pos, first.indent);
        let mut stack = vec![Frame::new(None, first.indent, None)];

        while let Some(frame) = stack.last_mut() {
            let Some(line) = lines.get(self.pos).filter(|l| l.indent >= frame.indent) else {
                log::trace!("leave block {:?} at line {}", frame.enclosing, self.pos);
                let Some(Frame { nodes, owner, .. }) = stack.pop() else {
                    break;
                };
                let Some(owner) = owner else {
                    return nodes;
                };
                if let Some(parent) = stack.last_mut() {
                    parent.nodes.push(owner.close(nodes));
                }
                continue;
            };

            let ctx = LineContext {
                enclosing: frame.enclosing,
                relative: frame.relative,
            };
            let rule = RuleKind::classify(line, &ctx);
            log::debug!(
                "line {} (indent {}) -> {:?} in {:?}",
                line.index,
                line.indent,
                rule,
                frame.enclosing
            );
            if let Some(kind) = rule.lint(line) {
                self.warnings
                    .push(ParseError::warning(kind, line.span.clone(), self.file_id));
            }

            // Step past the trigger; children start on the next line.
            self.pos += 1;
            frame.relative += 1;

            match rule.open(line, self.options) {
                Opening::Inline { tag, content } => frame.nodes.push(Node::Inline {
                    tag,
                    content,
                    span: line.span.clone(),
                }),
                Opening::Text(content) => frame.nodes.push(Node::Text {
                    content,
                    span: line.span.clone(),
                }),
                Opening::Element {
                    kind,
                    attributes,
                    close_tag,
                } => {
                    let owner = Owner {
                        kind,
                        attributes,
                        close_tag,
                        span: line.span.clone(),
                    };
                    match self.deeper_indent(line.indent) {
                        Some(indent) => {
                            log::trace!(
                                "enter block {:?} at line {} (indent {})",
                                rule,
                                self.pos,
                                indent
                            );
                            stack.push(Frame::new(Some(rule), indent, Some(owner)));
                        }
                        None => frame.nodes.push(owner.close(Vec::new())),
                    }
                }
            }
        }

        Vec::new()
    }

    /// Indent of the next line, if it is strictly deeper than `indent`.
    fn deeper_indent(&self, indent: usize) -> Option<usize> {
        self.lines
            .get(self.pos)
            .map(|next| next.indent)
            .filter(|&next| next > indent)
    }
}
