//! # transit-cli: Maintenance commands for the transit composite service
//!
//! Bootstraps the saved-route database and inspects what users have saved,
//! without going through the HTTP server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use transit_composite::providers::db;

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the saved_route and email_notification tables
    InitDb(InitDbArgs),
    /// Print the routes saved by a user as JSON
    Saved(SavedArgs),
}

#[derive(Parser, Debug)]
struct InitDbArgs {
    /// Path to the SQLite database file
    #[arg(long, env = "DB_URL", default_value = "db/transit.db")]
    db: String,
    /// Drop both tables before creating them, discarding every saved route
    #[arg(long)]
    reset: bool,
}

#[derive(Parser, Debug)]
struct SavedArgs {
    /// Path to the SQLite database file
    #[arg(long, env = "DB_URL", default_value = "db/transit.db")]
    db: String,
    /// The user whose saved routes are printed
    #[arg(long)]
    user_id: String,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::InitDb(args) => handle_init_db(&args).await,
        Commands::Saved(args) => handle_saved(&args).await,
    }
}

// --- Command Handlers ---

async fn handle_init_db(args: &InitDbArgs) -> Result<()> {
    let database = db::open_database(&args.db).await?;
    if args.reset {
        info!(db = %args.db, "Resetting schema.");
        db::reset_schema(&database).await?;
        println!("Reset saved_route and email_notification in '{}'.", args.db);
    } else {
        db::initialize_schema(&database).await?;
        println!("Initialized saved_route and email_notification in '{}'.", args.db);
    }
    Ok(())
}

async fn handle_saved(args: &SavedArgs) -> Result<()> {
    let database = db::open_database(&args.db).await?;
    let saved_routes = db::saved_routes_by_user(&database, &args.user_id).await?;
    info!(user_id = %args.user_id, count = saved_routes.len(), "Loaded saved routes.");
    println!("{}", serde_json::to_string_pretty(&saved_routes)?);
    Ok(())
}
