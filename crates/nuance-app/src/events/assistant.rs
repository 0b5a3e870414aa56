use kanal::AsyncSender;
use nuance_core::assistant::{AssistantError, FinishedTurn};
use nuance_types::{AppEvent, ChatMessage};

use crate::events::{Completion, describe};
use crate::state::{ClientState, Services};

pub const BUSY_NOTICE: &str = "আগের উত্তর এখনও আসছে, একটু অপেক্ষা করুন।";

pub async fn handle_toggle_assistant(
    client: &mut ClientState,
    services: &Services,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if client.assistant.toggle_open(services.chat.as_ref()) {
        send_opened(client, app_to_ui_tx).await
    } else {
        app_to_ui_tx.send(AppEvent::AssistantClosed).await?;
        Ok(())
    }
}

async fn send_opened(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let transcript = client.assistant.transcript().messages().to_vec();
    let error = client.assistant.last_error().map(describe);
    app_to_ui_tx
        .send(AppEvent::AssistantOpened { transcript, error })
        .await?;
    Ok(())
}

/// Start a chat turn. The turn task owns the session until it reports back,
/// so a second question while one is streaming is turned away.
pub async fn handle_ask(
    client: &mut ClientState,
    services: &Services,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    done_tx: &AsyncSender<Completion>,
    text: String,
) -> anyhow::Result<()> {
    // Asking from a closed panel opens it first
    if !client.assistant.is_open() {
        client.assistant.toggle_open(services.chat.as_ref());
        send_opened(client, app_to_ui_tx).await?;
        if !client.assistant.has_session() {
            // the opened panel already shows why
            return Ok(());
        }
    }

    let turn = match client.assistant.begin_turn(services.chat.as_ref(), &text) {
        Ok(turn) => turn,
        Err(AssistantError::Blank) => {
            tracing::debug!("blank chat message ignored");
            return Ok(());
        }
        Err(AssistantError::Busy) => {
            app_to_ui_tx
                .send(AppEvent::Notice(BUSY_NOTICE.to_string()))
                .await?;
            return Ok(());
        }
        Err(AssistantError::Ai(e)) => {
            tracing::warn!("chat unavailable: {e}");
            app_to_ui_tx.send(AppEvent::Notice(describe(&e))).await?;
            return Ok(());
        }
    };

    let echo = ChatMessage::user(turn.text());
    app_to_ui_tx.send(AppEvent::AssistantMessage(echo)).await?;

    let id = turn.id();
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let chunk_tx = done_tx.clone();
        let finished = turn
            .run(move |chunk| {
                // Unbounded, so this only fails once the loop is gone
                if chunk_tx
                    .try_send(Completion::ChatChunk { turn: id, chunk })
                    .is_err()
                {
                    tracing::debug!("dropping chunk for turn #{id}, event loop closed");
                }
            })
            .await;
        if let Err(e) = done_tx.send(Completion::ChatDone(finished)).await {
            tracing::debug!("chat turn #{id} finished after shutdown: {e}");
        }
    });

    Ok(())
}

pub async fn handle_chat_chunk(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    turn: u64,
    chunk: String,
) -> anyhow::Result<()> {
    if client.assistant.apply_chunk(turn, &chunk) {
        app_to_ui_tx.send(AppEvent::AssistantChunk(chunk)).await?;
    }
    Ok(())
}

/// Hand the session back and show whatever the panel added on finishing,
/// which is the fallback notice when the turn failed.
pub async fn handle_chat_done(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    finished: FinishedTurn,
) -> anyhow::Result<()> {
    let id = finished.id;
    let before = client.assistant.transcript().len();

    match client.assistant.finish_turn(finished) {
        Ok(()) => tracing::debug!("chat turn #{id} complete"),
        Err(e) => tracing::warn!("chat turn #{id} ended with error: {e}"),
    }
    app_to_ui_tx.send(AppEvent::AssistantTurnFinished).await?;

    let added = client.assistant.transcript().messages()[before..].to_vec();
    for message in added {
        app_to_ui_tx.send(AppEvent::AssistantMessage(message)).await?;
    }
    Ok(())
}
