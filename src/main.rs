//! Switchyard server.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup:  config → Router::draw(draw_routes) → RouteTable + HelperRegistry + ReverseRoutes
//!
//!   request:  axum catch-all ─▶ request id / trace / timeout layers
//!                            ─▶ session cookie + form body + method override
//!                            ─▶ RouteTable::dispatch (first match wins, fall through on Next)
//!                            ─▶ controller before filters ─▶ action ─▶ response
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;

use switchyard::config::{load_config, AppConfig};
use switchyard::http::RouteSummary;
use switchyard::observability::{logging, metrics};
use switchyard::routing::EntrySummary;
use switchyard::{app, lifecycle, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Declarative routing web server", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the application (default)
    Serve,
    /// Print the drawn route table
    Routes {
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RouteListing {
    routes: Vec<RouteSummary>,
    entries: Vec<EntrySummary>,
    helpers: Vec<app::helpers::HelperSummary>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    logging::init_logging(&config.observability);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Routes { json } => print_routes(config, json),
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("switchyard v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let state = app::build(config)?;
    let shutdown = Shutdown::new();
    tokio::spawn(lifecycle::shutdown_signal(shutdown.clone()));

    HttpServer::new(state).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(config: AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let state = app::build(config)?;
    let listing = RouteListing {
        routes: state.routes.summaries(),
        entries: state.reverse.summaries(),
        helpers: state.helpers.summaries(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for route in &listing.routes {
        println!("{:<8} {}", route.verb.as_str().to_uppercase(), route.pattern);
    }
    println!();
    for entry in &listing.entries {
        println!("{:<28} {}", format!("{}#{}", entry.controller, entry.action), entry.pattern);
    }
    println!();
    for helper in &listing.helpers {
        println!("{:<28} {}", helper.name, helper.pattern);
    }
    Ok(())
}
