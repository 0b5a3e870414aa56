use std::sync::Arc;

use nuance_ai::{ChatService, WordCatalog};
use nuance_config::Config;
use nuance_core::assistant::AssistantPanel;
use nuance_core::bookmarks::BookmarkStore;
use nuance_core::cards;
use nuance_core::explore::ExploreController;
use nuance_core::storage::KeyValueStore;
use nuance_types::{CardView, ExploreView, Tab};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }
}

/// Remote collaborators, injected so tests can swap them
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn WordCatalog>,
    pub chat: Arc<dyn ChatService>,
}

/// Everything the user sees. Owned by the event loop, its only writer.
pub struct ClientState {
    pub explore: ExploreController,
    pub bookmarks: BookmarkStore<Box<dyn KeyValueStore>>,
    pub assistant: AssistantPanel,
    pub tab: Tab,
}

impl ClientState {
    pub fn new(bookmarks: BookmarkStore<Box<dyn KeyValueStore>>) -> Self {
        Self {
            explore: ExploreController::new(),
            bookmarks,
            assistant: AssistantPanel::new(),
            tab: Tab::Explore,
        }
    }

    pub fn explore_view(&self) -> ExploreView {
        cards::explore_view(&self.explore, &self.bookmarks)
    }

    pub fn dictionary(&self) -> Vec<CardView> {
        cards::dictionary_cards(&self.bookmarks)
    }
}
