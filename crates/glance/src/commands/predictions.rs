use clap::ArgMatches;
use tracing::{error, info};

use super::helpers;

pub(crate) fn handle_predictions_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let session_id = matches
        .get_one::<String>("session")
        .ok_or("Session id is required")?;
    info!(event = "cli.predictions_started", session_id = session_id);

    let config = helpers::load_config_with_warning();
    let client = helpers::build_client(&config)?;
    let game = helpers::resolve_game(matches, &config);
    let only = helpers::parse_only_list(matches);
    let rt = helpers::runtime()?;

    let predictions =
        match rt.block_on(client.get_predictions_by_sess_id(session_id, &game, only.as_deref()))
        {
            Ok(predictions) => predictions,
            Err(e) => {
                error!(event = "cli.predictions_failed", session_id = session_id, error = %e);
                return Err(Box::new(e));
            }
        };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
    } else if predictions.values.is_empty() {
        println!("No predictions for session {}", predictions.session_id);
    } else {
        println!("Session {}:", predictions.session_id);
        for (name, value) in &predictions.values {
            println!("  {}: {}", name, helpers::render_value(value));
        }
    }

    info!(
        event = "cli.predictions_completed",
        count = predictions.values.len()
    );
    Ok(())
}
