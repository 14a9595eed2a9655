use clap::ArgMatches;
use tracing::{error, info};

use super::helpers;

pub(crate) fn handle_features_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let session_id = matches
        .get_one::<String>("session")
        .ok_or("Session id is required")?;
    info!(event = "cli.features_started", session_id = session_id);

    let config = helpers::load_config_with_warning();
    let client = helpers::build_client(&config)?;
    let game = helpers::resolve_game(matches, &config);
    let only = helpers::parse_only_list(matches);
    let rt = helpers::runtime()?;

    let features =
        match rt.block_on(client.get_features_by_sess_id(session_id, &game, only.as_deref())) {
            Ok(features) => features,
            Err(e) => {
                error!(event = "cli.features_failed", session_id = session_id, error = %e);
                return Err(Box::new(e));
            }
        };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&features)?);
    } else if features.features.is_empty() {
        println!("No features for session {}", features.session_id);
    } else {
        println!("Session {}:", features.session_id);
        for (name, value) in &features.features {
            println!("  {}: {}", name, helpers::render_value(value));
        }
    }

    info!(
        event = "cli.features_completed",
        count = features.features.len()
    );
    Ok(())
}
