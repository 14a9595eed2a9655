use clap::ArgMatches;
use tracing::error;

use glance_core::events;

pub mod helpers;

mod completions;
mod features;
mod hello;
mod names;
mod predictions;
mod sessions;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("hello", sub_matches)) => hello::handle_hello_command(sub_matches),
        Some(("sessions", sub_matches)) => sessions::handle_sessions_command(sub_matches),
        Some(("predictions", sub_matches)) => {
            predictions::handle_predictions_command(sub_matches)
        }
        Some(("features", sub_matches)) => features::handle_features_command(sub_matches),
        Some(("names", sub_matches)) => names::handle_names_command(sub_matches),
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
