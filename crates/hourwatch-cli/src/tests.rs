use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["hourwatch", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["hourwatch", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["hourwatch"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn check_defaults_to_every_location_and_writes() {
    let cli = Cli::try_parse_from(["hourwatch", "check"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Check {
            location: None,
            dry_run: false
        })
    ));
}

#[test]
fn check_with_location_and_dry_run() {
    let cli = Cli::try_parse_from([
        "hourwatch",
        "check",
        "--location",
        "bk-koramangala",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Check {
            location: Some(ref id),
            dry_run: true
        }) if id == "bk-koramangala"
    ));
}

#[test]
fn evaluate_requires_hours() {
    assert!(Cli::try_parse_from(["hourwatch", "evaluate"]).is_err());
}

#[test]
fn evaluate_parses_all_options() {
    let cli = Cli::try_parse_from([
        "hourwatch",
        "evaluate",
        "--hours",
        "11:00AM - 11:00PM",
        "--at",
        "2024-01-01T08:00:00Z",
        "--timezone",
        "Asia/Kolkata",
        "--fallback",
        "10:00 - 22:00",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Evaluate(EvaluateArgs {
            ref hours,
            at: Some(ref at),
            timezone: Some(ref tz),
            fallback: Some(_),
        })) if hours == "11:00AM - 11:00PM" && at == "2024-01-01T08:00:00Z" && tz == "Asia/Kolkata"
    ));
}

#[test]
fn status_mismatched_flag() {
    let cli = Cli::try_parse_from(["hourwatch", "status", "--mismatched"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Status { mismatched: true })
    ));
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["hourwatch", "collect"]).is_err());
}

fn route(args: &[&str]) -> Route {
    let cli = Cli::try_parse_from(args).expect("expected valid cli args");
    Route::from(cli.command.expect("expected a subcommand"))
}

#[test]
fn evaluate_routes_offline() {
    assert!(matches!(
        route(&["hourwatch", "evaluate", "--hours", "11 AM to 11 PM"]),
        Route::Offline(EvaluateArgs { ref hours, .. }) if hours == "11 AM to 11 PM"
    ));
}

#[test]
fn database_commands_route_through_config() {
    assert!(matches!(
        route(&["hourwatch", "check", "--dry-run"]),
        Route::Configured(ConfiguredCommand::Check {
            location: None,
            dry_run: true
        })
    ));
    assert!(matches!(
        route(&["hourwatch", "status"]),
        Route::Configured(ConfiguredCommand::Status { mismatched: false })
    ));
    assert!(matches!(
        route(&["hourwatch", "db", "migrate"]),
        Route::Configured(ConfiguredCommand::Db(DbCommands::Migrate))
    ));
}
