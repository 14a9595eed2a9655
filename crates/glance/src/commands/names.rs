use clap::ArgMatches;
use tracing::{error, info};

use super::helpers;

pub(crate) fn handle_names_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = matches
        .get_one::<String>("kind")
        .ok_or("Name kind is required")?;
    info!(event = "cli.names_started", kind = kind);

    let config = helpers::load_config_with_warning();
    let client = helpers::build_client(&config)?;
    let game = helpers::resolve_game(matches, &config);
    let rt = helpers::runtime()?;

    let result = match kind.as_str() {
        "predictions" => rt.block_on(client.get_prediction_names_by_game(&game)),
        "features" => rt.block_on(client.get_feature_names_by_game(&game)),
        other => return Err(format!("Unknown name kind '{}'", other).into()),
    };

    let names = match result {
        Ok(names) => names,
        Err(e) => {
            error!(event = "cli.names_failed", kind = kind, game = game, error = %e);
            return Err(Box::new(e));
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else if names.is_empty() {
        println!("No {} names for {}", kind, game);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    info!(event = "cli.names_completed", count = names.len());
    Ok(())
}
