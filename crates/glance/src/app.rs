use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("glance")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch live game-session telemetry from a realtime analytics service")
        .long_about(
            "glance polls a realtime game-telemetry service for the sessions currently \
            being played, diffs each poll against what is already shown, and emits minimal \
            add/remove/update instructions. Use the one-shot subcommands to inspect the \
            service, or 'watch' to follow a game live.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("hello").about("Check connectivity to the telemetry service"))
        .subcommand(
            Command::new("sessions")
                .about("List the sessions currently active for a game")
                .arg(
                    Arg::new("game")
                        .long("game")
                        .short('g')
                        .help("Game to query (defaults to games.default from config)"),
                )
                .arg(
                    Arg::new("require-player-id")
                        .long("require-player-id")
                        .help("Ask the service to filter out sessions without a valid player id")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("state")
                        .long("state")
                        .help("Restrict to one state (requires --city)")
                        .requires("city"),
                )
                .arg(
                    Arg::new("city")
                        .long("city")
                        .help("Restrict to one city (requires --state)")
                        .requires("state"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("predictions")
                .about("Show model predictions for one session")
                .arg(
                    Arg::new("session")
                        .help("Session id to query")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("game")
                        .long("game")
                        .short('g')
                        .help("Game the session belongs to (defaults to config)"),
                )
                .arg(
                    Arg::new("only")
                        .long("only")
                        .help("Comma-separated prediction names to fetch (default: all)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("features")
                .about("Show extracted feature values for one session")
                .arg(
                    Arg::new("session")
                        .help("Session id to query")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("game")
                        .long("game")
                        .short('g')
                        .help("Game the session belongs to (defaults to config)"),
                )
                .arg(
                    Arg::new("only")
                        .long("only")
                        .help("Comma-separated feature names to fetch (default: all)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("names")
                .about("List the prediction or feature names a game reports")
                .arg(
                    Arg::new("kind")
                        .help("Which name list to fetch")
                        .required(true)
                        .value_parser(["predictions", "features"])
                        .index(1),
                )
                .arg(
                    Arg::new("game")
                        .long("game")
                        .short('g')
                        .help("Game to query (defaults to config)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Follow a game's active sessions live, printing each change")
                .long_about(
                    "Polls the service on an interval, reconciles each result against the \
                    previous one, and prints one line per change: '+' for sessions that \
                    appeared, '-' for sessions that ended, '~' for detail refreshes of the \
                    selected session. Runs until interrupted.",
                )
                .arg(
                    Arg::new("game")
                        .long("game")
                        .short('g')
                        .help("Game to watch (defaults to games.default from config)"),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Poll interval in seconds (default: 5, or watch.poll_interval_secs)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .help("Session id whose predictions should be refreshed every poll"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print each change as a JSON instruction")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(clap::value_parser!(clap_complete::Shell))
                        .index(1),
                ),
        )
}

#[allow(dead_code)]
pub fn get_matches() -> ArgMatches {
    build_cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "glance");
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_hello_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "hello"]);
        assert!(matches.is_ok());
    }

    #[test]
    fn test_cli_sessions_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "sessions", "--game", "LAKELAND"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let sessions_matches = matches.subcommand_matches("sessions").unwrap();
        assert_eq!(
            sessions_matches.get_one::<String>("game").unwrap(),
            "LAKELAND"
        );
        assert!(!sessions_matches.get_flag("require-player-id"));
    }

    #[test]
    fn test_cli_sessions_state_requires_city() {
        let app = build_cli();
        let matches =
            app.try_get_matches_from(vec!["glance", "sessions", "--state", "Wisconsin"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_sessions_with_location() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "glance",
            "sessions",
            "--state",
            "Wisconsin",
            "--city",
            "Madison",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let sessions_matches = matches.subcommand_matches("sessions").unwrap();
        assert_eq!(
            sessions_matches.get_one::<String>("state").unwrap(),
            "Wisconsin"
        );
        assert_eq!(
            sessions_matches.get_one::<String>("city").unwrap(),
            "Madison"
        );
    }

    #[test]
    fn test_cli_sessions_json_flag() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "sessions", "--json"]);
        assert!(matches.is_ok());
        assert!(
            matches
                .unwrap()
                .subcommand_matches("sessions")
                .unwrap()
                .get_flag("json")
        );
    }

    #[test]
    fn test_cli_predictions_requires_session() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "predictions"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_predictions_with_only_filter() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "glance",
            "predictions",
            "19283098",
            "--game",
            "WAVES",
            "--only",
            "completion_chance,next_level",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let sub = matches.subcommand_matches("predictions").unwrap();
        assert_eq!(sub.get_one::<String>("session").unwrap(), "19283098");
        assert_eq!(
            sub.get_one::<String>("only").unwrap(),
            "completion_chance,next_level"
        );
    }

    #[test]
    fn test_cli_features_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "features", "19283098"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let sub = matches.subcommand_matches("features").unwrap();
        assert_eq!(sub.get_one::<String>("session").unwrap(), "19283098");
        assert!(sub.get_one::<String>("game").is_none());
    }

    #[test]
    fn test_cli_names_valid_kinds() {
        for kind in ["predictions", "features"] {
            let app = build_cli();
            let matches = app.try_get_matches_from(vec!["glance", "names", kind]);
            assert!(matches.is_ok(), "kind '{}' should parse", kind);
        }
    }

    #[test]
    fn test_cli_names_invalid_kind() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "names", "models"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_watch_defaults() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "watch"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let watch_matches = matches.subcommand_matches("watch").unwrap();
        assert!(watch_matches.get_one::<u64>("interval").is_none());
        assert!(watch_matches.get_one::<String>("select").is_none());
        assert!(!watch_matches.get_flag("json"));
    }

    #[test]
    fn test_cli_watch_with_options() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "glance", "watch", "-g", "LAKELAND", "-i", "10", "--select", "19283098",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let watch_matches = matches.subcommand_matches("watch").unwrap();
        assert_eq!(
            watch_matches.get_one::<String>("game").unwrap(),
            "LAKELAND"
        );
        assert_eq!(*watch_matches.get_one::<u64>("interval").unwrap(), 10);
        assert_eq!(
            watch_matches.get_one::<String>("select").unwrap(),
            "19283098"
        );
    }

    #[test]
    fn test_cli_watch_rejects_non_numeric_interval() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "watch", "--interval", "soon"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_global() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "-v", "hello"]);
        assert!(matches.is_ok());
        assert!(matches.unwrap().get_flag("verbose"));

        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "sessions", "--verbose"]);
        assert!(matches.is_ok());
        assert!(matches.unwrap().get_flag("verbose"));
    }

    #[test]
    fn test_cli_verbose_flag_default_false() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "hello"]);
        assert!(matches.is_ok());
        assert!(!matches.unwrap().get_flag("verbose"));
    }

    #[test]
    fn test_cli_completions_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "completions", "bash"]);
        assert!(matches.is_ok());
    }

    #[test]
    fn test_cli_completions_rejects_unknown_shell() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["glance", "completions", "dos"]);
        assert!(matches.is_err());
    }
}
