pub mod script_hook;

use crate::markup::{Attribute, ElementKind, InlineTag};
use crate::options::CompileOptions;
use crate::parser::error::ParseErrorKind;
use crate::rule::script_hook::ScriptHook;
use crate::source::Line;

/// Line classification rules.
///
/// Rules are tried in [`RULE_TABLE`] order and the first match wins, so the
/// order is part of the grammar: a `p.` line inside an object is a page
/// because `Page` is tried before `Other`, and `Action`/`When` only fire
/// in their enclosing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Title,
    ScriptTag,
    Object,
    Character,
    Action,
    When,
    Page,
    Paragraph,
    Other,
}

pub const RULE_TABLE: [RuleKind; 9] = [
    RuleKind::Title,
    RuleKind::ScriptTag,
    RuleKind::Object,
    RuleKind::Character,
    RuleKind::Action,
    RuleKind::When,
    RuleKind::Page,
    RuleKind::Paragraph,
    RuleKind::Other,
];

/// Where a line sits while it is being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    /// Rule of the block directly containing the line; `None` at top level.
    pub enclosing: Option<RuleKind>,
    /// Lines already consumed in the enclosing block.
    pub relative: usize,
}

/// What a rule emits for its triggering line.
#[derive(Debug, Clone, PartialEq)]
pub enum Opening {
    Inline {
        tag: InlineTag,
        content: String,
    },
    Element {
        kind: ElementKind,
        attributes: Vec<Attribute>,
        close_tag: &'static str,
    },
    Text(String),
}

impl RuleKind {
    /// First rule in table order accepting `line`.
    pub fn classify(line: &Line, ctx: &LineContext) -> RuleKind {
        RULE_TABLE
            .into_iter()
            .find(|rule| rule.matches(line, ctx))
            .unwrap_or(RuleKind::Other)
    }

    pub fn matches(self, line: &Line, ctx: &LineContext) -> bool {
        let trimmed = line.trimmed();
        match self {
            RuleKind::Title => line.index == 0,
            RuleKind::ScriptTag => ScriptHook::from_name(line.text.trim()).is_some(),
            RuleKind::Object => trimmed.starts_with("o."),
            RuleKind::Character => trimmed.starts_with("c."),
            RuleKind::Action => {
                matches!(ctx.enclosing, Some(RuleKind::Object | RuleKind::Character))
                    && trimmed.starts_with('"')
            }
            RuleKind::When => {
                ctx.enclosing == Some(RuleKind::Action)
                    && ctx.relative == 0
                    && trimmed.starts_with("when")
            }
            RuleKind::Page => trimmed.starts_with("p."),
            RuleKind::Paragraph => trimmed.starts_with("pg."),
            RuleKind::Other => true,
        }
    }

    /// Single-line rules never own an indented block.
    pub fn is_single_line(self) -> bool {
        matches!(self, RuleKind::Title | RuleKind::When | RuleKind::Other)
    }

    pub fn open(self, line: &Line, options: &CompileOptions) -> Opening {
        let trimmed = line.trimmed();
        match self {
            RuleKind::Title => Opening::Inline {
                tag: InlineTag::Title,
                content: line.text.clone(),
            },
            RuleKind::When => Opening::Inline {
                tag: InlineTag::When,
                content: trimmed.strip_prefix("when ").unwrap_or(trimmed).to_string(),
            },
            RuleKind::Other => Opening::Text(line.text.clone()),
            RuleKind::ScriptTag => {
                // `matches` already accepted the name; fall back to a literal line otherwise.
                match ScriptHook::from_name(line.text.trim()) {
                    Some(hook) => element(ElementKind::Script(hook), Vec::new(), hook.name()),
                    None => Opening::Text(line.text.clone()),
                }
            }
            RuleKind::Object | RuleKind::Character => {
                let (kind, close_tag) = if self == RuleKind::Object {
                    (ElementKind::Object, "obj")
                } else {
                    (ElementKind::Character, options.character_close.tag_name())
                };
                let mut attributes = vec![Attribute::new("id", prefixed_id(trimmed, 2))];
                if let Ok(Some(name)) = inventory_name(trimmed) {
                    attributes.push(Attribute::new("inventoryName", name));
                }
                element(kind, attributes, close_tag)
            }
            RuleKind::Action => element(
                ElementKind::Action,
                vec![Attribute::new("id", trimmed.replace('"', ""))],
                "action",
            ),
            RuleKind::Page => {
                let mut attributes = vec![Attribute::new("id", prefixed_id(trimmed, 2))];
                if line.text.contains("(first)") {
                    attributes.push(Attribute::new("class", "first"));
                }
                element(ElementKind::Page, attributes, "page")
            }
            RuleKind::Paragraph => element(
                ElementKind::Paragraph,
                vec![Attribute::new("id", prefixed_id(trimmed, 3))],
                "paragraph",
            ),
        }
    }

    /// Non-fatal problems on a line this rule accepted.
    pub fn lint(self, line: &Line) -> Option<ParseErrorKind> {
        match self {
            RuleKind::Object | RuleKind::Character => match inventory_name(line.trimmed()) {
                Err(Unterminated) => Some(ParseErrorKind::UnterminatedInventoryName(
                    line.trimmed().to_string(),
                )),
                Ok(_) => None,
            },
            _ => None,
        }
    }
}

fn element(kind: ElementKind, attributes: Vec<Attribute>, close_tag: &'static str) -> Opening {
    Opening::Element {
        kind,
        attributes,
        close_tag,
    }
}

/// First space-delimited token with its `prefix_len`-byte prefix removed.
fn prefixed_id(trimmed: &str, prefix_len: usize) -> &str {
    let token = trimmed.split(' ').next().unwrap_or("");
    token.get(prefix_len..).unwrap_or("")
}

struct Unterminated;

/// The first double-quoted substring of the line, if any. Empty names count
/// as absent.
fn inventory_name(trimmed: &str) -> Result<Option<&str>, Unterminated> {
    let Some(open) = trimmed.find('"') else {
        return Ok(None);
    };
    let rest = &trimmed[open + 1..];
    match rest.find('"') {
        Some(0) => Ok(None),
        Some(close) => Ok(Some(&rest[..close])),
        None => Err(Unterminated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(index: usize, text: &str) -> Line {
        Line {
            index,
            indent: crate::source::leading_width(text),
            text: text.to_string(),
            span: 0..text.len(),
        }
    }

    fn in_block(enclosing: Option<RuleKind>, relative: usize) -> LineContext {
        LineContext {
            enclosing,
            relative,
        }
    }

    fn classify(text: &str, enclosing: Option<RuleKind>, relative: usize) -> RuleKind {
        RuleKind::classify(&line(5, text), &in_block(enclosing, relative))
    }

    #[test]
    fn first_line_is_always_the_title() {
        let ctx = in_block(None, 0);
        assert_eq!(RuleKind::classify(&line(0, "p.start"), &ctx), RuleKind::Title);
        assert_eq!(RuleKind::classify(&line(1, "p.start"), &ctx), RuleKind::Page);
    }

    #[test]
    fn script_hooks_match_whole_trimmed_line() {
        assert_eq!(classify("initscript", None, 1), RuleKind::ScriptTag);
        assert_eq!(classify("    afterEveryPageTurn", None, 1), RuleKind::ScriptTag);
        assert_eq!(classify("initscript now", None, 1), RuleKind::Other);
        assert_eq!(classify("InitScript", None, 1), RuleKind::Other);
    }

    #[test]
    fn actions_need_an_object_or_character_parent() {
        assert_eq!(classify("\"Examine\"", Some(RuleKind::Object), 0), RuleKind::Action);
        assert_eq!(classify("\"Talk\"", Some(RuleKind::Character), 2), RuleKind::Action);
        assert_eq!(classify("\"Examine\"", Some(RuleKind::Page), 0), RuleKind::Other);
        assert_eq!(classify("\"Examine\"", None, 0), RuleKind::Other);
    }

    #[test]
    fn when_only_opens_an_action() {
        assert_eq!(classify("when lit", Some(RuleKind::Action), 0), RuleKind::When);
        assert_eq!(classify("when lit", Some(RuleKind::Action), 1), RuleKind::Other);
        assert_eq!(classify("when lit", Some(RuleKind::Page), 0), RuleKind::Other);
    }

    #[test]
    fn prefixes_win_over_context() {
        assert_eq!(classify("p.cellar", Some(RuleKind::Object), 0), RuleKind::Page);
        assert_eq!(classify("pg.note", Some(RuleKind::Action), 0), RuleKind::Paragraph);
        assert_eq!(classify("o.key", Some(RuleKind::Action), 3), RuleKind::Object);
    }

    #[test]
    fn single_line_rules_never_open_elements() {
        for rule in RULE_TABLE {
            let text = if rule == RuleKind::ScriptTag { "initscript" } else { "x.y" };
            let opens_element = matches!(
                rule.open(&line(3, text), &CompileOptions::default()),
                Opening::Element { .. }
            );
            assert_eq!(rule.is_single_line(), !opens_element, "{rule:?}");
        }
    }

    #[test]
    fn object_with_inventory_name() {
        let opening = RuleKind::Object.open(
            &line(3, "    o.lamp \"A brass lamp\" extra"),
            &CompileOptions::default(),
        );
        assert_eq!(
            opening,
            Opening::Element {
                kind: ElementKind::Object,
                attributes: vec![
                    Attribute::new("id", "lamp"),
                    Attribute::new("inventoryName", "A brass lamp"),
                ],
                close_tag: "obj",
            }
        );
    }

    #[test]
    fn character_close_tag_follows_options() {
        let line = line(2, "c.bob");
        let legacy = RuleKind::Character.open(&line, &CompileOptions::default());
        let Opening::Element { close_tag, .. } = legacy else {
            panic!("expected element");
        };
        assert_eq!(close_tag, "obj");

        let options = CompileOptions {
            character_close: crate::options::CharacterClose::Character,
            ..CompileOptions::default()
        };
        let Opening::Element { close_tag, .. } = RuleKind::Character.open(&line, &options) else {
            panic!("expected element");
        };
        assert_eq!(close_tag, "character");
    }

    #[test]
    fn page_id_and_first_marker() {
        let Opening::Element { attributes, .. } =
            RuleKind::Page.open(&line(1, "p.start (first)"), &CompileOptions::default())
        else {
            panic!("expected element");
        };
        assert_eq!(
            attributes,
            vec![Attribute::new("id", "start"), Attribute::new("class", "first")]
        );
    }

    #[test]
    fn action_id_drops_every_quote() {
        let Opening::Element { attributes, .. } =
            RuleKind::Action.open(&line(4, "  \"Look \"\"closely\""), &CompileOptions::default())
        else {
            panic!("expected element");
        };
        assert_eq!(attributes, vec![Attribute::new("id", "Look closely")]);
    }

    #[test]
    fn when_content_loses_keyword() {
        let opening =
            RuleKind::When.open(&line(4, "    when lamp.lit"), &CompileOptions::default());
        assert_eq!(
            opening,
            Opening::Inline {
                tag: InlineTag::When,
                content: "lamp.lit".to_string()
            }
        );
    }

    #[test]
    fn unterminated_inventory_name_is_linted() {
        let line = line(1, "o.lamp \"A brass lamp");
        assert_eq!(
            RuleKind::Object.lint(&line),
            Some(ParseErrorKind::UnterminatedInventoryName("o.lamp \"A brass lamp".into()))
        );
        let Opening::Element { attributes, .. } =
            RuleKind::Object.open(&line, &CompileOptions::default())
        else {
            panic!("expected element");
        };
        assert_eq!(attributes, vec![Attribute::new("id", "lamp")]);
    }
}
