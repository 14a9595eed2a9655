use clap::ArgMatches;
use tracing::{error, info};

use super::helpers;

pub(crate) fn handle_hello_command(
    _matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.hello_started");

    let config = helpers::load_config_with_warning();
    let client = helpers::build_client(&config)?;
    let rt = helpers::runtime()?;

    match rt.block_on(client.say_hello()) {
        Ok(greeting) => {
            println!("{}", greeting);
            info!(event = "cli.hello_completed");
            Ok(())
        }
        Err(e) => {
            error!(event = "cli.hello_failed", error = %e);
            Err(Box::new(e))
        }
    }
}
