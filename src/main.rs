#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

use cfront_distro::app::cfront::{CanonicalForm, Distribution, DistributionConfig};
use cfront_distro::app::custom_resource::{request_payload, CustomResourceEvent};
use cfront_distro::app::settings::Settings;
use cfront_distro::{trace_debug, trace_error, trace_info, trace_warn};

#[derive(Parser)]
#[command(name = "cfront-distro")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT"), ")"))]
#[command(about = "Map CloudFormation-style CloudFront distribution configs to the API form", long_about = None)]
struct Cli {
    /// Settings file to use instead of the one in the config directory
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Use this CallerReference instead of generating one
    #[arg(long, global = true, value_name = "REF")]
    caller_reference: Option<String>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a DistributionConfig and print its CloudFront API form
    Map {
        /// JSON file with the external-form DistributionConfig
        config: PathBuf,
        /// JSON file with a tag list; prints {DistributionConfig, Tags}
        #[arg(long, value_name = "PATH")]
        tags: Option<PathBuf>,
    },
    /// Print the request a custom resource event would send to CloudFront
    Event {
        /// JSON file with the custom resource event
        event: PathBuf,
    },
}

fn init_logging(settings: &Settings) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => tracing_subscriber::EnvFilter::builder()
            .parse(directives)
            .context("Invalid RUST_LOG")?,
        _ => tracing_subscriber::EnvFilter::builder()
            .parse(&settings.log_filter)
            .with_context(|| format!("Invalid log_filter '{}'", settings.log_filter))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match &settings.log_file {
        Some(log_path) => {
            if let Some(parent) = log_path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(log_path)
                .with_context(|| format!("Failed to open log file {:?}", log_path))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Ok(metadata) = file.metadata() {
                    let mut perms = metadata.permissions();
                    perms.set_mode(0o600);
                    if let Err(e) = std::fs::set_permissions(log_path, perms) {
                        eprintln!("Failed to set log file permissions: {}", e);
                    }
                }
            }

            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false),
                )
                .try_init()
                .context("Failed to set tracing subscriber")?;
        }
        None => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(false),
                )
                .try_init()
                .context("Failed to set tracing subscriber")?;
        }
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {:?}", path))
}

fn run(cli: &Cli, settings: &Settings) -> Result<Value> {
    let provider = settings.caller_reference_provider(cli.caller_reference.as_deref());
    match &cli.command {
        Commands::Map { config, tags } => {
            let config = read_json(config)?;
            match tags {
                Some(tags) => {
                    let tags = read_json(tags)?;
                    let distribution =
                        Distribution::from_external_form_with(&config, Some(&tags), provider.as_ref())?;
                    Ok(distribution.to_canonical_form())
                }
                None => {
                    let config = DistributionConfig::from_external_form_with(&config, provider.as_ref())?;
                    Ok(config.to_canonical_form())
                }
            }
        }
        Commands::Event { event } => {
            let event = CustomResourceEvent::from_value(read_json(event)?)?;
            trace_info!(
                "{} event for {} ({})",
                event.request_type,
                event.logical_resource_id,
                event.resource_type
            );
            request_payload(&event, provider.as_ref())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (settings, ignored_settings) = match &cli.settings {
        Some(path) => match Settings::load_from_path(path) {
            Ok(settings) => (settings, None),
            Err(e) => {
                eprintln!("error: {:#}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::load(),
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }
    if let Some(e) = ignored_settings {
        trace_warn!("ignoring settings file, using defaults: {:#}", e);
    }
    trace_debug!("cfront-distro {} starting", env!("GIT_COMMIT"));

    let output = match run(&cli, &settings) {
        Ok(output) => output,
        Err(e) => {
            if settings.log_file.is_some() {
                trace_error!("{:#}", e);
            }
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let rendered = if cli.compact || !settings.pretty_output {
        serde_json::to_string(&output)
    } else {
        serde_json::to_string_pretty(&output)
    };
    match rendered {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
