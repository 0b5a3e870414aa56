use kanal::AsyncSender;
use nuance_core::cards::toggle_saved;
use nuance_types::{AppEvent, Tab, WordEntry};

use crate::state::ClientState;

pub async fn handle_toggle_save(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    entry: WordEntry,
) -> anyhow::Result<()> {
    let dictionary = toggle_saved(&mut client.bookmarks, &entry);
    let saved = client.bookmarks.contains(&entry);
    tracing::info!(
        "'{}' {}, {} saved",
        entry.arabic(),
        if saved { "saved" } else { "removed" },
        dictionary.len()
    );

    // Both tabs carry saved marks, refresh them together
    let view = client.explore_view();
    app_to_ui_tx.send(AppEvent::ShowDictionary(dictionary)).await?;
    app_to_ui_tx.send(AppEvent::ShowExplore(view)).await?;

    let notice = if saved {
        format!("{} ডিকশনারিতে সেভ হয়েছে", entry.arabic())
    } else {
        format!("{} ডিকশনারি থেকে সরানো হয়েছে", entry.arabic())
    };
    app_to_ui_tx.send(AppEvent::Notice(notice)).await?;
    Ok(())
}

pub async fn handle_switch_tab(
    client: &mut ClientState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    tab: Tab,
) -> anyhow::Result<()> {
    client.tab = tab;
    app_to_ui_tx.send(AppEvent::SwitchTab(tab)).await?;
    Ok(())
}
