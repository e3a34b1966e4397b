/// Lifecycle hooks the story engine fires. A line consisting of just one of
/// these names opens a script block of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptHook {
    InitScript,
    BeforeEveryThing,
    BeforeEveryPageTurn,
    BeforeEveryParagraphShown,
    AfterEveryThing,
    AfterEveryPageTurn,
    AfterEveryParagraphShown,
}

impl ScriptHook {
    pub const ALL: [ScriptHook; 7] = [
        ScriptHook::InitScript,
        ScriptHook::BeforeEveryThing,
        ScriptHook::BeforeEveryPageTurn,
        ScriptHook::BeforeEveryParagraphShown,
        ScriptHook::AfterEveryThing,
        ScriptHook::AfterEveryPageTurn,
        ScriptHook::AfterEveryParagraphShown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScriptHook::InitScript => "initscript",
            ScriptHook::BeforeEveryThing => "beforeEveryThing",
            ScriptHook::BeforeEveryPageTurn => "beforeEveryPageTurn",
            ScriptHook::BeforeEveryParagraphShown => "beforeEveryParagraphShown",
            ScriptHook::AfterEveryThing => "afterEveryThing",
            ScriptHook::AfterEveryPageTurn => "afterEveryPageTurn",
            ScriptHook::AfterEveryParagraphShown => "afterEveryParagraphShown",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|hook| hook.name() == name)
    }
}
