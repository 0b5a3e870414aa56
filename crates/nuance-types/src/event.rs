use crate::{ChatMessage, WordEntry};

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    BackendReady {
        suggested_topics: Vec<String>,
    },
    ShowExplore(ExploreView),
    ShowDictionary(Vec<CardView>),
    SwitchTab(Tab),
    AssistantOpened {
        transcript: Vec<ChatMessage>,
        error: Option<String>,
    },
    AssistantClosed,
    /// A whole transcript line (user echo or fallback notice)
    AssistantMessage(ChatMessage),
    /// Streamed reply fragment, concatenated by the renderer
    AssistantChunk(String),
    AssistantTurnFinished,
    Notice(String),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Search(String),
    SelectSuggested(String),
    Retry,
    Reset,
    ToggleSave(WordEntry),
    SwitchTab(Tab),
    ToggleAssistant,
    Ask(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Explore,
    Dictionary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// A word card as shown on either tab
#[derive(Debug, Clone)]
pub struct CardView {
    pub entry: WordEntry,
    pub saved: bool,
}

/// Snapshot of the explore tab
#[derive(Debug, Clone)]
pub struct ExploreView {
    pub topic: String,
    pub status: LoadingState,
    pub cards: Vec<CardView>,
    pub can_reset: bool,
    pub error: Option<String>,
}
