pub mod commands;
pub mod render;
pub mod state;

use std::io::{BufRead, Write};

use kanal::{AsyncReceiver, AsyncSender};
use nuance_config::ui::UiConfig;
use nuance_types::{AppEvent, UiEvent};

use crate::state::UiState;

/// Terminal front end: reads commands from stdin and renders app events to stdout
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: UiConfig,
) -> anyhow::Result<()> {
    let lines = spawn_stdin_reader();
    let mut state = UiState::new(config.show_category);
    let mut out = std::io::stdout();

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Ok(line) = line else {
                    tracing::info!("stdin closed");
                    send(&ui_to_app_tx, UiEvent::Quit).await;
                    break;
                };
                let command = commands::parse(&line);
                let (events, text) = state.on_command(command);
                write_out(&mut out, &text);

                let quit = events.iter().any(|e| matches!(e, UiEvent::Quit));
                for event in events {
                    send(&ui_to_app_tx, event).await;
                }
                if quit {
                    break;
                }
            }
            event = app_to_ui_rx.recv() => {
                let Ok(event) = event else {
                    tracing::info!("app channel closed, leaving UI loop");
                    break;
                };
                let text = state.on_app_event(event);
                write_out(&mut out, &text);
            }
        }
    }

    Ok(())
}

async fn send(tx: &AsyncSender<AppEvent>, event: UiEvent) {
    if let Err(e) = tx.send(AppEvent::UiEvent(event)).await {
        tracing::error!("failed to send UI event: {e}");
    }
}

fn write_out(out: &mut impl Write, text: &str) {
    if text.is_empty() {
        return;
    }
    if out.write_all(text.as_bytes()).and_then(|_| out.flush()).is_err() {
        tracing::warn!("stdout unavailable");
    }
}

/// Blocking stdin reads live on their own thread so they never hold up the
/// runtime or its shutdown.
fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded_async::<String>(16);
    let tx = tx.to_sync();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}
