//! GeoPDF binding demo.
//!
//! Runs one binding operation and prints its response envelope as JSON on
//! stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geopdf::{GeoPdfService, ResponseEnvelope, ServiceConfig};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "geopdf-demo")]
#[command(about = "Inspect and render georeferenced PDFs")]
struct Args {
    /// Configuration file path (YAML). Environment variables are used when absent.
    #[arg(short, long, env = "GEOPDF_CONFIG")]
    config: Option<PathBuf>,

    /// Upscaling factor for page fallback rendering
    #[arg(long, env = "GEOPDF_FALLBACK_SCALE")]
    fallback_scale: Option<f32>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Pretty-print the response envelope
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geospatial library version
    Version,
    /// List registered drivers
    Drivers,
    /// Look up one driver by short name
    Driver { name: String },
    /// Read raster metadata from a GeoPDF
    Info { file: PathBuf },
    /// Render a GeoPDF to PNG
    Render { input: PathBuf, output: PathBuf },
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServiceConfig::from_env(),
    };

    if let Some(scale) = args.fallback_scale {
        config.fallback_scale = scale;
    }

    config.validate()?;
    Ok(config)
}

fn print_envelope<T: Serialize>(envelope: ResponseEnvelope<T>, pretty: bool) -> Result<bool> {
    let ok = envelope.is_success();
    let json = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{}", json);
    Ok(ok)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let config = load_config(&args)?;
    info!(
        fallback_scale = config.fallback_scale,
        scan_limit_bytes = config.scan_limit_bytes,
        "Starting GeoPDF demo"
    );

    let service = GeoPdfService::start(config)?;

    let ok = match args.command {
        Command::Version => print_envelope(service.get_version_info().await, args.pretty)?,
        Command::Drivers => print_envelope(service.list_drivers().await, args.pretty)?,
        Command::Driver { name } => print_envelope(service.find_driver(name).await, args.pretty)?,
        Command::Info { file } => print_envelope(service.read_geopdf(file).await, args.pretty)?,
        Command::Render { input, output } => print_envelope(
            service.render_geopdf_to_png(input, output).await,
            args.pretty,
        )?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
