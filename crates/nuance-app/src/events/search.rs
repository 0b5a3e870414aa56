use kanal::AsyncSender;
use nuance_ai::AiError;
use nuance_core::explore::SearchTicket;
use nuance_types::{AppEvent, Tab, WordEntry};

use crate::events::{Completion, describe};
use crate::state::{ClientState, Services};

/// Show the loading state and fetch in the background. `None` means the
/// controller refused the input (blank topic).
pub async fn start_search(
    client: &mut ClientState,
    services: &Services,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    done_tx: &AsyncSender<Completion>,
    ticket: Option<SearchTicket>,
) -> anyhow::Result<()> {
    let Some(ticket) = ticket else {
        tracing::debug!("blank topic ignored");
        return Ok(());
    };

    let view = client.explore_view();
    app_to_ui_tx.send(AppEvent::ShowExplore(view)).await?;

    // Searching always lands on the explore tab
    if client.tab != Tab::Explore {
        client.tab = Tab::Explore;
        app_to_ui_tx.send(AppEvent::SwitchTab(Tab::Explore)).await?;
    }

    let catalog = services.catalog.clone();
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let result = catalog.fetch_by_topic(ticket.topic()).await;
        if let Err(e) = done_tx.send(Completion::Search { ticket, result }).await {
            tracing::debug!("search finished after shutdown: {e}");
        }
    });

    Ok(())
}

pub async fn handle_search_done(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    ticket: SearchTicket,
    result: Result<Vec<WordEntry>, AiError>,
) -> anyhow::Result<()> {
    if !client.explore.complete(ticket, result) {
        return Ok(());
    }

    let view = client.explore_view();
    app_to_ui_tx.send(AppEvent::ShowExplore(view)).await?;

    let notice = client
        .explore
        .last_error()
        .filter(|e| matches!(e, AiError::Configuration))
        .map(describe);
    if let Some(notice) = notice {
        app_to_ui_tx.send(AppEvent::Notice(notice)).await?;
    }

    Ok(())
}

pub async fn handle_reset(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    client.explore.reset();
    tracing::debug!("explore reset to defaults");

    let view = client.explore_view();
    app_to_ui_tx.send(AppEvent::ShowExplore(view)).await?;
    Ok(())
}
