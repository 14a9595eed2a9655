use clap::ArgMatches;
use tracing::{debug, error, info};

use glance_core::SessionRecord;

use super::helpers;
use crate::table::TableFormatter;

pub(crate) fn handle_sessions_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.sessions_started");

    let config = helpers::load_config_with_warning();
    let client = helpers::build_client(&config)?;
    let game = helpers::resolve_game(matches, &config);
    let require_player_id =
        matches.get_flag("require-player-id") || config.watch.require_player_id;
    let rt = helpers::runtime()?;

    let result = match (
        matches.get_one::<String>("state"),
        matches.get_one::<String>("city"),
    ) {
        (Some(state), Some(city)) => {
            rt.block_on(client.get_active_sessions_by_loc(&game, state, city))
        }
        _ => rt.block_on(client.get_all_active_sessions(&game, require_player_id)),
    };

    let sessions = match result {
        Ok(sessions) => sessions,
        Err(e) => {
            error!(event = "cli.sessions_failed", game = game, error = %e);
            return Err(Box::new(e));
        }
    };

    if let Some(notice) = sessions.notice() {
        debug!(event = "cli.sessions_notice", notice = notice);
    }

    if matches.get_flag("json") {
        let records: Vec<&SessionRecord> = sessions.records().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if sessions.is_empty() {
        println!("No active sessions for {}", game);
    } else {
        let records: Vec<SessionRecord> = sessions.records().cloned().collect();
        let formatter = TableFormatter::new(&records);
        formatter.print_table(&records);
        println!("{} active session(s) for {}", records.len(), game);
    }

    info!(event = "cli.sessions_completed", count = sessions.len());
    Ok(())
}
