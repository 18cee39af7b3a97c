//! city-compare entry point.
//!
//! Logging goes to stderr so reports on stdout stay clean.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citycmp_client::Transport;
use citycmp_core::AppConfig;

mod app;
mod interactive;
mod report;

use app::App;

#[derive(Parser)]
#[command(
    name = "city-compare",
    about = "Compare Michigan cities by restaurants and events",
    version,
    after_help = "Run 'city-compare' with no command to enter interactive mode."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Rebuild the database: cities, events and the reference city's restaurants
    Collect,
    /// Compare one city against the reference city
    Compare {
        /// City name, e.g. "Ann Arbor"
        city: String,
    },
    /// Prompt for cities until `exit`
    Interactive,
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn dispatch<T: Transport>(app: &mut App<T>, command: Commands) -> Result<()> {
    match command {
        Commands::Collect => {
            let summary = app.collect(Local::now().date_naive()).await?;
            tracing::info!(
                locations = summary.locations,
                events = summary.events,
                restaurants = summary.restaurants,
                "collection finished"
            );
            println!("{}", app.summary().await?);
        }
        Commands::Compare { city } => {
            println!("{}", app.compare(&city).await?);
        }
        Commands::Interactive => interactive::run(app).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = AppConfig::load()?;
    let mut app = App::open(config).await?;

    let result = dispatch(&mut app, cli.command.unwrap_or(Commands::Interactive)).await;
    app.finish();
    result
}
