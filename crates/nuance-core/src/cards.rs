//! Card projections for both tabs. Saved state always comes from the
//! bookmark store, so a toggle on one tab is reflected on the other.

use nuance_types::{CardView, ExploreView, WordEntry};

use crate::bookmarks::BookmarkStore;
use crate::explore::ExploreController;
use crate::storage::KeyValueStore;

pub fn cards_for<S: KeyValueStore>(entries: &[WordEntry], store: &BookmarkStore<S>) -> Vec<CardView> {
    entries
        .iter()
        .map(|entry| CardView {
            entry: entry.clone(),
            saved: store.contains(entry),
        })
        .collect()
}

pub fn explore_view<S: KeyValueStore>(
    explore: &ExploreController,
    store: &BookmarkStore<S>,
) -> ExploreView {
    ExploreView {
        topic: explore.topic().to_string(),
        status: explore.status(),
        cards: cards_for(explore.results(), store),
        can_reset: explore.can_reset(),
        error: explore.error_message().map(str::to_string),
    }
}

/// The dictionary tab: every saved word, newest first
pub fn dictionary_cards<S: KeyValueStore>(store: &BookmarkStore<S>) -> Vec<CardView> {
    store
        .entries()
        .iter()
        .map(|entry| CardView {
            entry: entry.clone(),
            saved: true,
        })
        .collect()
}

/// Toggle from any card, returning the refreshed dictionary cards
pub fn toggle_saved<S: KeyValueStore>(
    store: &mut BookmarkStore<S>,
    entry: &WordEntry,
) -> Vec<CardView> {
    store.toggle(entry);
    dictionary_cards(store)
}
