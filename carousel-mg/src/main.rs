//! carousel-mg - Carousel slide relationship migration tool
//!
//! Consolidates legacy carousel slide relationships (polymorphic parent
//! fields and historical junction tables) into the canonical join table.
//! Runs once from the CLI or stays resident serving the same operation over
//! HTTP. Safe to re-run at any time.

use anyhow::Result;
use carousel_common::config::resolve_database_path;
use carousel_common::db::init_database;
use carousel_mg::migrate::report::{OutputMode, Reporter};
use carousel_mg::migrate::{run_analysis, run_migration};
use carousel_mg::{build_router, AppState};
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "carousel-mg", version, about = "Carousel slide relationship migration tool")]
struct Cli {
    /// Path to the SQLite database (falls back to CAROUSEL_DB, then the
    /// config file, then the platform data directory)
    #[arg(long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the migration once and exit
    Run,
    /// Report on remaining legacy structures without writing anything
    Analyze,
    /// Serve the migration over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 5780)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber first so every later step is visible
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting carousel migration tool (carousel-mg) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();

    let db_path = resolve_database_path(cli.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Run => {
            let mut report = Reporter::new(OutputMode::Cli);
            if let Err(e) = run_migration(&pool, &mut report).await {
                // No rollback of rows already written; re-running converges
                error!("Migration failed: {}", e);
                anyhow::bail!("migration aborted: {}", e);
            }
        }
        Command::Analyze => {
            let mut report = Reporter::new(OutputMode::Cli);
            if let Err(e) = run_analysis(&pool, &mut report).await {
                error!("Analysis failed: {}", e);
                anyhow::bail!("analysis aborted: {}", e);
            }
        }
        Command::Serve { port } => {
            let state = AppState::new(pool);
            let app = build_router(state);

            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
            info!("carousel-mg listening on http://127.0.0.1:{}", port);
            info!("Health check: http://127.0.0.1:{}/health", port);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
