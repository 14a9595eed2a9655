use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use glance_core::events;
use glance_core::{RenderSink, TelemetrySource, ViewUpdate, Watcher};

use super::helpers;

/// Sink that prints each instruction as one stdout line.
///
/// Line format mirrors the instruction stream: `+` for added sessions,
/// `-` for removed ones, `~` for in-place detail refreshes.
struct PrintSink {
    json: bool,
}

impl RenderSink for PrintSink {
    fn apply(&mut self, updates: Vec<ViewUpdate>) {
        for update in updates {
            if self.json {
                match serde_json::to_string(&update) {
                    Ok(line) => println!("{}", line),
                    Err(e) => error!(event = "cli.watch_encode_failed", error = %e),
                }
                continue;
            }
            let stamp = chrono::Local::now().format("%H:%M:%S");
            match update {
                ViewUpdate::SessionsAdded { ids } => {
                    for id in ids {
                        println!("{} + {}", stamp, id);
                    }
                }
                ViewUpdate::SessionsRemoved { ids } => {
                    for id in ids {
                        println!("{} - {}", stamp, id);
                    }
                }
                ViewUpdate::SessionUpdated { id, fields } => {
                    let rendered: Vec<String> = fields
                        .iter()
                        .map(|(name, value)| {
                            format!("{}={}", name, helpers::render_value(value))
                        })
                        .collect();
                    println!("{} ~ {} {}", stamp, id, rendered.join(" "));
                }
                ViewUpdate::SelectionCleared => println!("{} selection cleared", stamp),
            }
        }
    }
}

pub(crate) fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = helpers::load_config_with_warning();
    let client = helpers::build_client(&config)?;
    let game = helpers::resolve_game(matches, &config);
    let interval_secs = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or_else(|| config.watch.poll_interval_secs());
    if interval_secs == 0 {
        return Err("Poll interval must be greater than 0".into());
    }
    let selection = matches.get_one::<String>("select").cloned();
    let json = matches.get_flag("json");

    info!(
        event = "cli.watch_started",
        game = game,
        interval_secs = interval_secs
    );

    let source = TelemetrySource::new(client, config.watch.require_player_id);
    let sink = PrintSink { json };
    let rt = helpers::runtime()?;

    rt.block_on(async move {
        let mut watcher = Watcher::new(source, sink, game, Duration::from_secs(interval_secs));

        if let Some(session_id) = selection {
            // The selection can only validate against a populated active
            // set, so poll before selecting.
            watcher.poll_once().await;
            if !watcher.select(&session_id).await {
                eprintln!(
                    "Warning: session '{}' is not active; watching without a selection",
                    session_id
                );
            }
        }

        tokio::select! {
            _ = watcher.run() => {}
            _ = tokio::signal::ctrl_c() => {
                info!(event = "cli.watch_interrupted");
            }
        }
    });

    events::log_app_shutdown();
    Ok(())
}
