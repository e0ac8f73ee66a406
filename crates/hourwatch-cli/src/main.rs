mod check;
mod evaluate;
mod status;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hourwatch")]
#[command(about = "Expected-vs-actual open status checks for restaurant listings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one check cycle over the configured locations
    Check {
        /// Restrict the cycle to a single location (by id)
        #[arg(long)]
        location: Option<String>,

        /// Fetch and evaluate without writing to the database or sending alerts
        #[arg(long)]
        dry_run: bool,
    },
    /// Evaluate an hours string against an instant without touching the network
    Evaluate(EvaluateArgs),
    /// Show the latest stored status per restaurant
    Status {
        /// Only show restaurants whose expected and actual status disagree
        #[arg(long)]
        mismatched: bool,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    /// Free text such as "11:00AM - 11:00PM", or a JSON weekday mapping
    #[arg(long)]
    hours: String,

    /// Instant to evaluate, RFC 3339 (defaults to now)
    #[arg(long)]
    at: Option<String>,

    /// IANA zone the location runs in (defaults to Asia/Kolkata)
    #[arg(long)]
    timezone: Option<String>,

    /// Window applied to free-text hours, e.g. "11:00 - 23:00"
    #[arg(long)]
    fallback: Option<String>,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("HOURWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("hourwatch: run with --help to list commands");
        return Ok(());
    };

    match Route::from(command) {
        Route::Offline(args) => evaluate::run_evaluate(
            &args.hours,
            args.at.as_deref(),
            args.timezone.as_deref(),
            args.fallback.as_deref(),
        ),
        Route::Configured(command) => run_with_config(command).await,
    }
}

/// Commands that need `AppConfig` (and so `DATABASE_URL`) before they run.
#[derive(Debug)]
enum ConfiguredCommand {
    Check {
        location: Option<String>,
        dry_run: bool,
    },
    Status {
        mismatched: bool,
    },
    Db(DbCommands),
}

#[derive(Debug)]
enum Route {
    /// Runs without config or a database.
    Offline(EvaluateArgs),
    Configured(ConfiguredCommand),
}

impl From<Commands> for Route {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Evaluate(args) => Self::Offline(args),
            Commands::Check { location, dry_run } => {
                Self::Configured(ConfiguredCommand::Check { location, dry_run })
            }
            Commands::Status { mismatched } => {
                Self::Configured(ConfiguredCommand::Status { mismatched })
            }
            Commands::Db { command } => Self::Configured(ConfiguredCommand::Db(command)),
        }
    }
}

async fn run_with_config(command: ConfiguredCommand) -> anyhow::Result<()> {
    let config = hourwatch_core::load_app_config()?;

    match command {
        ConfiguredCommand::Check { location, dry_run } => {
            check::run_check(&config, location.as_deref(), dry_run).await?;
        }
        ConfiguredCommand::Status { mismatched } => {
            let pool = connect(&config).await?;
            status::run_status(&pool, mismatched).await?;
        }
        ConfiguredCommand::Db(command) => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    hourwatch_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = hourwatch_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
    }

    Ok(())
}

async fn connect(config: &hourwatch_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = hourwatch_db::PoolConfig::from_app_config(config);
    let pool = hourwatch_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
