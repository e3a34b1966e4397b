use std::fmt;
use std::ops::Range;

use crate::rule::script_hook::ScriptHook;

/// A node of the compiled story markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Single-line tag with its content on the same line: `<title>..</title>`.
    Inline {
        tag: InlineTag,
        content: String,
        span: Range<usize>,
    },
    /// Multi-line tag wrapping the nodes of an indented block.
    Element(Element),
    /// A literal line, emitted verbatim (relative indentation included).
    Text {
        content: String,
        span: Range<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTag {
    Title,
    When,
}

impl InlineTag {
    pub fn name(self) -> &'static str {
        match self {
            InlineTag::Title => "title",
            InlineTag::When => "when",
        }
    }
}

/// Kinds of multi-line elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Script(ScriptHook),
    Object,
    Character,
    Action,
    Page,
    Paragraph,
}

impl ElementKind {
    /// Opening tag name.
    pub fn tag_name(self) -> &'static str {
        match self {
            ElementKind::Script(hook) => hook.name(),
            ElementKind::Object => "obj",
            ElementKind::Character => "character",
            ElementKind::Action => "action",
            ElementKind::Page => "page",
            ElementKind::Paragraph => "paragraph",
        }
    }

    /// Elements whose literal lines may carry link placeholders.
    pub fn hosts_links(self) -> bool {
        matches!(
            self,
            ElementKind::Page | ElementKind::Paragraph | ElementKind::Action
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Attribute {
            name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Closing tag name. Usually the opening tag name, but `character`
    /// closes with `obj` unless configured otherwise.
    pub close_tag: &'static str,
    /// Byte span of the triggering line.
    pub span: Range<usize>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn is_first_page(&self) -> bool {
        self.kind == ElementKind::Page && self.attribute("class") == Some("first")
    }
}

/// Depth-first, pre-order iterator over every element under a node list.
pub struct Elements<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Elements<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Elements {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

enum Step<'a> {
    Node(&'a Node),
    Close(&'static str),
}

/// Render `nodes` one marker per line. Nesting is walked with an explicit
/// stack.
pub(crate) fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    let mut steps: Vec<Step<'_>> = nodes.iter().rev().map(Step::Node).collect();
    while let Some(step) = steps.pop() {
        match step {
            Step::Close(tag) => writeln!(f, "</{}>", tag)?,
            Step::Node(Node::Inline { tag, content, .. }) => {
                writeln!(f, "<{name}>{content}</{name}>", name = tag.name())?
            }
            Step::Node(Node::Text { content, .. }) => writeln!(f, "{}", content)?,
            Step::Node(Node::Element(element)) => {
                write_open_tag(f, element)?;
                steps.push(Step::Close(element.close_tag));
                steps.extend(element.children.iter().rev().map(Step::Node));
            }
        }
    }
    Ok(())
}

fn write_open_tag(f: &mut fmt::Formatter<'_>, element: &Element) -> fmt::Result {
    write!(f, "<{}", element.kind.tag_name())?;
    for attribute in &element.attributes {
        write!(f, " {}=\"{}\"", attribute.name, attribute.value)?;
    }
    writeln!(f, ">")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, std::slice::from_ref(self))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_open_tag(f, self)?;
        write_nodes(f, &self.children)?;
        writeln!(f, "</{}>", self.close_tag)
    }
}
