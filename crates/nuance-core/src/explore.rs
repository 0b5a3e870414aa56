use nuance_ai::{AiError, WordCatalog};
use nuance_types::{LoadingState, WordEntry};

use crate::defaults::{DEFAULT_TOPIC, clean_topic, default_words};

/// Shown instead of the raw error, with a retry affordance
pub const ERROR_MESSAGE: &str = "দুঃখিত, তথ্য লোড করতে সমস্যা হয়েছে। দয়া করে আবার চেষ্টা করুন।";

/// Whether the built-in cards or search results are on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsView {
    Default,
    Custom,
}

/// Issued for every accepted search. Only the ticket with the latest token may
/// apply its result; older ones are discarded when they resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    token: u64,
    topic: String,
}

impl SearchTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

pub struct ExploreController {
    topic: String,
    results: Vec<WordEntry>,
    status: LoadingState,
    view: ResultsView,
    last_error: Option<AiError>,
    token: u64,
}

impl Default for ExploreController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExploreController {
    pub fn new() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            results: default_words().to_vec(),
            status: LoadingState::Idle,
            view: ResultsView::Default,
            last_error: None,
            token: 0,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn results(&self) -> &[WordEntry] {
        &self.results
    }

    pub fn status(&self) -> LoadingState {
        self.status
    }

    pub fn view(&self) -> ResultsView {
        self.view
    }

    pub fn last_error(&self) -> Option<&AiError> {
        self.last_error.as_ref()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        (self.status == LoadingState::Error).then_some(ERROR_MESSAGE)
    }

    /// The "back to first page" control is offered only away from the defaults
    pub fn can_reset(&self) -> bool {
        self.view == ResultsView::Custom
    }

    /// Start a search. Blank input is ignored; anything else supersedes a
    /// search still in flight.
    pub fn begin_search(&mut self, topic: &str) -> Option<SearchTicket> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }

        self.token += 1;
        self.topic = topic.to_string();
        self.status = LoadingState::Loading;
        tracing::debug!("search #{} for '{}'", self.token, self.topic);

        Some(SearchTicket {
            token: self.token,
            topic: self.topic.clone(),
        })
    }

    pub fn begin_suggested(&mut self, label: &str) -> Option<SearchTicket> {
        self.begin_search(clean_topic(label))
    }

    /// Re-issue the search for the topic currently shown
    pub fn begin_retry(&mut self) -> Option<SearchTicket> {
        let topic = self.topic.clone();
        self.begin_search(&topic)
    }

    /// Apply a fetch result. Returns false when the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<WordEntry>, AiError>,
    ) -> bool {
        if ticket.token != self.token {
            tracing::debug!(
                "discarding stale result #{} for '{}' (current #{})",
                ticket.token,
                ticket.topic,
                self.token
            );
            return false;
        }

        match result {
            Ok(entries) => {
                tracing::info!("'{}': showing {} entries", ticket.topic, entries.len());
                self.results = entries;
                self.view = ResultsView::Custom;
                self.status = LoadingState::Success;
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("search for '{}' failed: {e}", ticket.topic);
                self.status = LoadingState::Error;
                self.last_error = Some(e);
            }
        }
        true
    }

    pub async fn search(&mut self, catalog: &dyn WordCatalog, topic: &str) -> bool {
        match self.begin_search(topic) {
            Some(ticket) => self.run(catalog, ticket).await,
            None => false,
        }
    }

    pub async fn select_suggested(&mut self, catalog: &dyn WordCatalog, label: &str) -> bool {
        match self.begin_suggested(label) {
            Some(ticket) => self.run(catalog, ticket).await,
            None => false,
        }
    }

    pub async fn retry(&mut self, catalog: &dyn WordCatalog) -> bool {
        match self.begin_retry() {
            Some(ticket) => self.run(catalog, ticket).await,
            None => false,
        }
    }

    /// Back to the built-in topic and cards. Any search in flight is orphaned.
    pub fn reset(&mut self) {
        self.token += 1;
        self.topic = DEFAULT_TOPIC.to_string();
        self.results = default_words().to_vec();
        self.status = LoadingState::Idle;
        self.view = ResultsView::Default;
        self.last_error = None;
    }

    async fn run(&mut self, catalog: &dyn WordCatalog, ticket: SearchTicket) -> bool {
        let result = catalog.fetch_by_topic(ticket.topic()).await;
        self.complete(ticket, result)
    }
}
