use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use nuance_config::Config;
use nuance_types::AppEvent;
use tokio::sync::RwLock;

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let ui_config = config.read().await.ui.clone();
    nuance_ui::ui_loop(app_to_ui_rx, ui_to_app_tx, ui_config).await
}
