//! Link placeholder rewriting.
//!
//! Literal lines inside pages, paragraphs and actions may contain three
//! placeholder syntaxes, each turned into a link tag understood by the
//! story engine:
//!
//! - `[[ID]]TEXT[[]]` becomes `<turn to="ID">TEXT</turn>`
//! - `{[ID]}TEXT{[]}` becomes `<interact with="ID">TEXT</interact>`
//! - `((ID))TEXT(())` becomes `<show paragraph="ID">TEXT</show>`
//!
//! The rules run in that order, each as a global replace over one line, so
//! a later rule sees the output of the earlier ones. Only text whose direct
//! parent is a page, paragraph or action is touched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::Story;
use crate::markup::{Element, Node};
use crate::options::LinkCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Turn to another page.
    Turn,
    /// Interact with an object.
    Interact,
    /// Show a paragraph.
    Show,
}

impl LinkKind {
    pub const ORDER: [LinkKind; 3] = [LinkKind::Turn, LinkKind::Interact, LinkKind::Show];

    fn replacement(self) -> &'static str {
        match self {
            LinkKind::Turn => r#"<turn to="${1}">${2}</turn>"#,
            LinkKind::Interact => r#"<interact with="${1}">${2}</interact>"#,
            LinkKind::Show => r#"<show paragraph="${1}">${2}</show>"#,
        }
    }

    fn pattern(self, capture: LinkCapture) -> &'static Regex {
        let patterns = &*PATTERNS;
        let index = self as usize;
        match capture {
            LinkCapture::Greedy => &patterns.greedy[index],
            LinkCapture::Lazy => &patterns.lazy[index],
        }
    }
}

struct Patterns {
    greedy: [Regex; 3],
    lazy: [Regex; 3],
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| {
    let build = |open: &str, close: &str, end: &str, any: &str| {
        Regex::new(&format!("{open}({any}){close}({any}){end}")).expect("invalid link pattern")
    };
    let set = |any: &str| {
        [
            build(r"\[\[", r"\]\]", r"\[\[\]\]", any),
            build(r"\{\[", r"\]\}", r"\{\[\]\}", any),
            build(r"\(\(", r"\)\)", r"\(\(\)\)", any),
        ]
    };
    Patterns {
        greedy: set(".*"),
        lazy: set(".*?"),
    }
});

/// Apply the three link rules, in order, to one line of text.
pub fn rewrite_text(text: &str, capture: LinkCapture) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(text);
    for kind in LinkKind::ORDER {
        let rewritten = match kind.pattern(capture).replace_all(&out, kind.replacement()) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(rewritten) => rewritten,
        };
        out = Cow::Owned(rewritten);
    }
    out
}

/// Rewrite placeholders in every eligible text node under `nodes`.
/// Returns the number of text nodes that changed.
pub fn rewrite_nodes(nodes: &mut [Node], capture: LinkCapture) -> usize {
    let mut changed = 0;
    let mut pending: Vec<&mut Element> = nodes.iter_mut().filter_map(as_element).collect();
    while let Some(element) = pending.pop() {
        let Element { kind, children, .. } = element;
        let hosts_links = kind.hosts_links();
        for child in children {
            match child {
                Node::Element(nested) => pending.push(nested),
                Node::Text { content, .. } if hosts_links => {
                    let rewritten = match rewrite_text(content, capture) {
                        Cow::Borrowed(_) => continue,
                        Cow::Owned(rewritten) => rewritten,
                    };
                    log::debug!("rewrote links in <{}>: {}", kind.tag_name(), rewritten.trim());
                    *content = rewritten;
                    changed += 1;
                }
                _ => {}
            }
        }
    }
    changed
}

fn as_element(node: &mut Node) -> Option<&mut Element> {
    match node {
        Node::Element(element) => Some(element),
        _ => None,
    }
}

pub fn rewrite_story(story: &mut Story, capture: LinkCapture) -> usize {
    rewrite_nodes(&mut story.nodes, capture)
}
