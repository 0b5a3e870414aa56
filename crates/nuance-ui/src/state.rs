use nuance_types::{AppEvent, CardView, ExploreView, Tab, UiEvent};

use crate::commands::Command;
use crate::render;

/// What the terminal currently shows. The app owns the real state; this is
/// the last snapshot of it, kept so card and topic numbers can be resolved.
pub struct UiState {
    pub tab: Tab,
    pub explore: Option<ExploreView>,
    pub dictionary: Vec<CardView>,
    pub suggested: Vec<String>,
    pub assistant_open: bool,
    /// A reply line is being printed chunk by chunk
    pub streaming: bool,
    pub show_category: bool,
}

impl UiState {
    pub fn new(show_category: bool) -> Self {
        Self {
            tab: Tab::Explore,
            explore: None,
            dictionary: Vec::new(),
            suggested: Vec::new(),
            assistant_open: false,
            streaming: false,
            show_category,
        }
    }

    fn visible_cards(&self) -> &[CardView] {
        match self.tab {
            Tab::Explore => self.explore.as_ref().map(|v| v.cards.as_slice()).unwrap_or(&[]),
            Tab::Dictionary => &self.dictionary,
        }
    }

    /// Turn a typed command into events for the app plus any local output
    pub fn on_command(&mut self, command: Command) -> (Vec<UiEvent>, String) {
        match command {
            Command::Text(text) if self.assistant_open => (vec![UiEvent::Ask(text)], String::new()),
            Command::Text(topic) | Command::Search(topic) => {
                if topic.trim().is_empty() {
                    (vec![], "বিষয় লিখুন, যেমন: জ্ঞান, মৃত্যু...\n".to_string())
                } else {
                    (vec![UiEvent::Search(topic)], String::new())
                }
            }
            Command::Topics => (vec![], render::topics(&self.suggested)),
            Command::Topic(n) => match n.checked_sub(1).and_then(|i| self.suggested.get(i)) {
                Some(label) => (vec![UiEvent::SelectSuggested(label.clone())], String::new()),
                None => (vec![], format!("{n} নম্বর বিষয় নেই (/topics)\n")),
            },
            Command::Retry => (vec![UiEvent::Retry], String::new()),
            Command::Reset => (vec![UiEvent::Reset], String::new()),
            Command::Save(n) => match n.checked_sub(1).and_then(|i| self.visible_cards().get(i)) {
                Some(card) => (vec![UiEvent::ToggleSave(card.entry.clone())], String::new()),
                None => (vec![], format!("{n} নম্বর কার্ড নেই\n")),
            },
            Command::Tab(tab) => (vec![UiEvent::SwitchTab(tab)], String::new()),
            Command::Chat => (vec![UiEvent::ToggleAssistant], String::new()),
            Command::Ask(text) => (vec![UiEvent::Ask(text)], String::new()),
            Command::Help => (vec![], format!("{}\n", render::HELP)),
            Command::Quit => (vec![UiEvent::Quit], String::new()),
            Command::Empty => (vec![], String::new()),
            Command::Invalid(line) => (vec![], format!("অজানা কমান্ড: {line} (/help)\n")),
        }
    }

    /// Apply an app event and return what should be printed
    pub fn on_app_event(&mut self, event: AppEvent) -> String {
        let mut out = self.end_stream_line(&event);

        match event {
            AppEvent::BackendReady { suggested_topics } => {
                self.suggested = suggested_topics;
                out.push_str("কোরআনের শব্দের গভীর অর্থ অনুসন্ধান। /help দেখুন।\n");
                out.push_str(&render::topics(&self.suggested));
            }
            AppEvent::ShowExplore(view) => {
                if self.tab == Tab::Explore {
                    out.push_str(&render::explore(&view, self.show_category));
                }
                self.explore = Some(view);
            }
            AppEvent::ShowDictionary(cards) => {
                if self.tab == Tab::Dictionary {
                    out.push_str(&render::dictionary(&cards, self.show_category));
                }
                self.dictionary = cards;
            }
            AppEvent::SwitchTab(tab) => {
                self.tab = tab;
                out.push_str(&render::tab_bar(tab, self.dictionary.len()));
                out.push('\n');
                match tab {
                    Tab::Explore => {
                        if let Some(view) = &self.explore {
                            out.push_str(&render::explore(view, self.show_category));
                        }
                    }
                    Tab::Dictionary => {
                        out.push_str(&render::dictionary(&self.dictionary, self.show_category));
                    }
                }
            }
            AppEvent::AssistantOpened { transcript, error } => {
                self.assistant_open = true;
                out.push_str(&render::transcript(&transcript));
                if let Some(error) = error {
                    out.push_str(&format!("! {error}\n"));
                }
            }
            AppEvent::AssistantClosed => {
                self.assistant_open = false;
                out.push_str("(অ্যাসিস্ট্যান্ট বন্ধ)\n");
            }
            AppEvent::AssistantMessage(message) => {
                out.push_str(&render::message(&message));
                out.push('\n');
            }
            AppEvent::AssistantChunk(chunk) => {
                if !self.streaming {
                    self.streaming = true;
                    out.push_str(render::speaker(nuance_types::ChatRole::Assistant));
                    out.push_str(": ");
                }
                out.push_str(&chunk);
            }
            AppEvent::AssistantTurnFinished => {}
            AppEvent::Notice(text) => {
                out.push_str(&text);
                out.push('\n');
            }
            AppEvent::UiEvent(_) => {}
        }
        out
    }

    /// Close a half-printed reply before anything else is written
    fn end_stream_line(&mut self, event: &AppEvent) -> String {
        if self.streaming && !matches!(event, AppEvent::AssistantChunk(_)) {
            self.streaming = false;
            "\n".to_string()
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use nuance_types::{ChatMessage, LoadingState, WordEntry};

    use super::*;

    fn entry(arabic: &str) -> WordEntry {
        WordEntry::new(arabic, "t", "m", "n", "r")
    }

    fn explore_view(cards: Vec<CardView>) -> ExploreView {
        ExploreView {
            topic: "t".to_string(),
            status: LoadingState::Success,
            cards,
            can_reset: false,
            error: None,
        }
    }

    #[test]
    fn bare_text_searches_until_assistant_opens() {
        let mut state = UiState::new(true);
        let (events, _) = state.on_command(Command::Text("ধৈর্য".to_string()));
        assert!(matches!(events.as_slice(), [UiEvent::Search(t)] if t == "ধৈর্য"));

        state.on_app_event(AppEvent::AssistantOpened {
            transcript: vec![],
            error: None,
        });
        let (events, _) = state.on_command(Command::Text("প্রশ্ন".to_string()));
        assert!(matches!(events.as_slice(), [UiEvent::Ask(t)] if t == "প্রশ্ন"));
    }

    #[test]
    fn save_resolves_card_on_visible_tab() {
        let mut state = UiState::new(true);
        state.on_app_event(AppEvent::ShowExplore(explore_view(vec![
            CardView { entry: entry("a"), saved: false },
            CardView { entry: entry("b"), saved: false },
        ])));
        state.on_app_event(AppEvent::ShowDictionary(vec![CardView {
            entry: entry("z"),
            saved: true,
        }]));

        let (events, _) = state.on_command(Command::Save(2));
        assert!(matches!(events.as_slice(), [UiEvent::ToggleSave(e)] if e.arabic() == "b"));

        state.on_app_event(AppEvent::SwitchTab(Tab::Dictionary));
        let (events, _) = state.on_command(Command::Save(1));
        assert!(matches!(events.as_slice(), [UiEvent::ToggleSave(e)] if e.arabic() == "z"));

        let (events, text) = state.on_command(Command::Save(5));
        assert!(events.is_empty());
        assert!(!text.is_empty());
    }

    #[test]
    fn topic_number_maps_to_suggestion_label() {
        let mut state = UiState::new(true);
        state.on_app_event(AppEvent::BackendReady {
            suggested_topics: vec!["হৃদয় (Heart)".to_string()],
        });

        let (events, _) = state.on_command(Command::Topic(1));
        assert!(matches!(events.as_slice(), [UiEvent::SelectSuggested(l)] if l == "হৃদয় (Heart)"));
        assert!(state.on_command(Command::Topic(2)).0.is_empty());
    }

    #[test]
    fn streamed_chunks_print_on_one_line() {
        let mut state = UiState::new(true);
        let mut out = String::new();
        out += &state.on_app_event(AppEvent::AssistantChunk("আসসা".to_string()));
        out += &state.on_app_event(AppEvent::AssistantChunk("লামু".to_string()));
        out += &state.on_app_event(AppEvent::AssistantTurnFinished);
        out += &state.on_app_event(AppEvent::AssistantMessage(ChatMessage::user("x")));

        assert_eq!(out, "অ্যাসিস্ট্যান্ট: আসসালামু\nআপনি: x\n");
    }

    #[test]
    fn hidden_tab_is_not_printed_but_remembered() {
        let mut state = UiState::new(true);
        let text = state.on_app_event(AppEvent::ShowDictionary(vec![CardView {
            entry: entry("z"),
            saved: true,
        }]));
        assert!(text.is_empty());
        assert_eq!(state.dictionary.len(), 1);
    }
}
