use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use nuance_ai::AiError;
use nuance_core::assistant::FinishedTurn;
use nuance_core::bookmarks::BookmarkStore;
use nuance_core::defaults::SUGGESTED_TOPICS;
use nuance_core::explore::SearchTicket;
use nuance_core::storage::KeyValueStore;
use nuance_types::{AppEvent, UiEvent, WordEntry};
use tokio_util::sync::CancellationToken;

use crate::state::{AppState, ClientState, Services};

pub mod assistant;
pub mod bookmark;
pub mod search;

use assistant::{handle_ask, handle_chat_chunk, handle_chat_done, handle_toggle_assistant};
use bookmark::{handle_switch_tab, handle_toggle_save};
use search::{handle_reset, handle_search_done, start_search};

pub const MISSING_KEY_NOTICE: &str =
    "API কী পাওয়া যায়নি। GEMINI_API_KEY সেট করে অ্যাপটি আবার চালু করুন।";

/// Results of work running outside the loop, fed back in for applying
pub enum Completion {
    Search {
        ticket: SearchTicket,
        result: Result<Vec<WordEntry>, AiError>,
    },
    ChatChunk {
        turn: u64,
        chunk: String,
    },
    ChatDone(FinishedTurn),
}

/// Text shown to the user for a service problem
pub fn describe(error: &AiError) -> String {
    match error {
        AiError::Configuration => MISSING_KEY_NOTICE.to_string(),
        other => other.to_string(),
    }
}

/// App's main loop. Sole owner of the client state; fetches and chat turns
/// run as tasks and report back through the completion channel.
pub async fn event_loop(
    state: Arc<AppState>,
    services: Services,
    storage: Box<dyn KeyValueStore>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (bookmarks_key, has_credential) = {
        let config = state.config.read().await;
        (
            config.storage.bookmarks_key.clone(),
            config.gemini.has_credential(),
        )
    };

    let mut client = ClientState::new(BookmarkStore::load_with_key(storage, bookmarks_key));
    let (done_tx, done_rx) = kanal::unbounded_async::<Completion>();

    app_to_ui_tx
        .send(AppEvent::BackendReady {
            suggested_topics: SUGGESTED_TOPICS.iter().map(|t| t.to_string()).collect(),
        })
        .await?;
    let dictionary = client.dictionary();
    let explore = client.explore_view();
    app_to_ui_tx.send(AppEvent::ShowDictionary(dictionary)).await?;
    app_to_ui_tx.send(AppEvent::ShowExplore(explore)).await?;
    if !has_credential {
        tracing::warn!("no Gemini API key configured, searches and chat will fail");
        app_to_ui_tx
            .send(AppEvent::Notice(MISSING_KEY_NOTICE.to_string()))
            .await?;
    }

    tracing::info!("event loop started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("event loop cancelled");
                break;
            }
            event = ui_to_app_rx.recv() => {
                let Ok(event) = event else {
                    tracing::info!("UI channel closed, leaving event loop");
                    break;
                };
                tracing::debug!("event received: {:?}", std::mem::discriminant(&event));

                if !handle_events(&mut client, &services, &app_to_ui_tx, &done_tx, event).await? {
                    cancel.cancel();
                    break;
                }
            }
            done = done_rx.recv() => {
                // done_tx lives in this scope, so the channel cannot close here
                let Ok(done) = done else { break };
                handle_completion(&mut client, &app_to_ui_tx, done).await?;
            }
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit
async fn handle_events(
    client: &mut ClientState,
    services: &Services,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    done_tx: &AsyncSender<Completion>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    let AppEvent::UiEvent(event) = event else {
        // Display-only events, nothing to do on this side
        return Ok(true);
    };

    match event {
        UiEvent::Search(topic) => {
            let ticket = client.explore.begin_search(&topic);
            start_search(client, services, app_to_ui_tx, done_tx, ticket).await?;
        }
        UiEvent::SelectSuggested(label) => {
            let ticket = client.explore.begin_suggested(&label);
            start_search(client, services, app_to_ui_tx, done_tx, ticket).await?;
        }
        UiEvent::Retry => {
            let ticket = client.explore.begin_retry();
            start_search(client, services, app_to_ui_tx, done_tx, ticket).await?;
        }
        UiEvent::Reset => {
            handle_reset(client, app_to_ui_tx).await?;
        }
        UiEvent::ToggleSave(entry) => {
            handle_toggle_save(client, app_to_ui_tx, entry).await?;
        }
        UiEvent::SwitchTab(tab) => {
            handle_switch_tab(client, app_to_ui_tx, tab).await?;
        }
        UiEvent::ToggleAssistant => {
            handle_toggle_assistant(client, services, app_to_ui_tx).await?;
        }
        UiEvent::Ask(text) => {
            handle_ask(client, services, app_to_ui_tx, done_tx, text).await?;
        }
        UiEvent::Quit => {
            tracing::info!("quit requested");
            return Ok(false);
        }
    }

    Ok(true)
}

async fn handle_completion(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    done: Completion,
) -> anyhow::Result<()> {
    match done {
        Completion::Search { ticket, result } => {
            handle_search_done(client, app_to_ui_tx, ticket, result).await
        }
        Completion::ChatChunk { turn, chunk } => {
            handle_chat_chunk(client, app_to_ui_tx, turn, chunk).await
        }
        Completion::ChatDone(finished) => handle_chat_done(client, app_to_ui_tx, finished).await,
    }
}
