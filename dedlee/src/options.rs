use serde::Deserialize;

/// Knobs for a single compile. The defaults reproduce the historical
/// dedlee output exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompileOptions {
    pub link_capture: LinkCapture,
    pub character_close: CharacterClose,
    pub rewrite_links: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            link_capture: LinkCapture::Greedy,
            character_close: CharacterClose::Obj,
            rewrite_links: true,
        }
    }
}

/// How link placeholder captures are matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkCapture {
    /// Captures run to the last closing delimiter on the line, so two
    /// placeholders of the same syntax on one line merge into one link.
    #[default]
    Greedy,
    /// Leftmost-shortest captures: every placeholder becomes its own link.
    Lazy,
}

/// Closing tag used for `c.` character blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterClose {
    /// `</obj>`, as the story engine has always received it.
    #[default]
    Obj,
    /// `</character>`, matching the opening tag.
    Character,
}

impl CharacterClose {
    pub fn tag_name(self) -> &'static str {
        match self {
            CharacterClose::Obj => "obj",
            CharacterClose::Character => "character",
        }
    }
}
