//! catalog-image-export - Export catalog image URLs as CSV
//!
//! `export` runs one batch from a file; `serve` starts the REST API.

#![allow(missing_docs)]

use catalog_image_export::api::{self, AppState};
use catalog_image_export::{CatalogEndpoint, Config, Result, export_file};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog-image-export")]
#[command(version, about = "Export product image URLs from the catalog as CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export image URLs for the identifiers in a file
    Export(ExportArgs),
    /// Serve the batch export REST API
    Serve(ServeArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Identifier file: one per line, or CSV when --column is given
    #[arg(long, short)]
    input: PathBuf,

    /// Where to write the CSV document
    #[arg(long, short)]
    output: PathBuf,

    /// Read identifiers from this column of a CSV input file; the output keeps
    /// every input column and appends the image columns
    #[arg(long)]
    column: Option<String>,

    /// Catalog endpoint to resolve identifiers against (ean or variants)
    #[arg(long)]
    endpoint: Option<CatalogEndpoint>,

    /// Maximum number of image columns
    #[arg(long)]
    max_images: Option<usize>,

    /// Minimum delay between catalog requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Header of the identifier column in the output (text input only)
    #[arg(long)]
    id_column: Option<String>,

    /// Catalog API base URL
    #[arg(long, env = "CATALOG_BASE_URL")]
    base_url: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind the API server to
    #[arg(long, env = "CATALOG_BIND_ADDRESS")]
    bind: Option<SocketAddr>,

    /// Catalog API base URL
    #[arg(long, env = "CATALOG_BASE_URL")]
    base_url: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Export(args) => export(args).await,
        Commands::Serve(args) => serve(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn export(args: ExportArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(base_url) = args.base_url {
        config.catalog.base_url = base_url;
    }
    if let Some(endpoint) = args.endpoint {
        config.catalog.endpoint = endpoint;
    }
    if let Some(cap) = args.max_images {
        config.batch.max_image_columns = Some(cap);
    }
    if let Some(delay_ms) = args.delay_ms {
        config.batch.request_delay = Duration::from_millis(delay_ms);
    }
    if let Some(id_column) = args.id_column {
        config.batch.id_column = id_column;
    }
    config.validate()?;

    let batch = export_file(&config, &args.input, args.column.as_deref(), &args.output).await?;

    tracing::info!(
        identifiers = batch.stats.identifiers,
        fetched = batch.stats.fetched,
        cache_hits = batch.stats.cache_hits,
        absent = batch.stats.absent,
        width = batch.width,
        "Export finished"
    );
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(bind) = args.bind {
        config.server.api.bind_address = bind;
    }
    if let Some(base_url) = args.base_url {
        config.catalog.base_url = base_url;
    }
    config.validate()?;

    let state = AppState::from_config(Arc::new(config))?;
    api::start_api_server(state).await
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::from_json_file(path)?;
            tracing::info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
