//! Command-line interface for the NetHome hub.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use nethome_model::{ItemInstance, ModelDescriptor, ModelRegistry};
use nethome_server::builtin::standard_factory;
use nethome_server::{HomeServer, ServerConfig, LOG_ENV_VAR};

/// NetHome - a hub for scriptable home automation items.
#[derive(Parser, Debug)]
#[command(name = "nethome")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the hub until interrupted.
    Serve {
        /// Config file (falls back to NETHOME_CONFIG, then defaults).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the attribute/action model of a builtin item class.
    Model {
        /// Registered class name, e.g. "Lamp".
        class: String,
    },
    /// Parse a model XML file and report problems.
    Validate {
        /// Path to the XML file.
        path: PathBuf,
    },
    /// List the item classes the hub ships with.
    Classes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(if args.verbose { "debug" } else { "info" })
        });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Serve { config } => serve(config).await,
        Command::Model { class } => print_model(&class),
        Command::Validate { path } => validate(&path),
        Command::Classes => {
            for class in standard_factory().classes() {
                println!("{class}");
            }
            Ok(())
        }
    }
}

async fn serve(config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => ServerConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::from_env().context("loading config from environment")?,
    };

    let server = HomeServer::with_config(standard_factory(), config);
    let created = server.boot();
    tracing::info!(created, "hub booted");

    let handle = server.start();
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    server.shutdown(handle);
    Ok(())
}

fn print_model(class: &str) -> Result<()> {
    let factory = standard_factory();
    let item = factory
        .create(class)
        .with_context(|| format!("no such item class: {class}"))?;
    let instance = ItemInstance::new(item);

    let registry = ModelRegistry::new();
    let model = registry.model_for(instance.item())?;
    println!("{}", serde_json::to_string_pretty(&model.info())?);
    Ok(())
}

fn validate(path: &PathBuf) -> Result<()> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let descriptor = ModelDescriptor::parse(&xml)
        .with_context(|| format!("parsing {}", path.display()))?;

    println!(
        "{}: class {}, {} attribute(s), {} action(s)",
        path.display(),
        descriptor.class,
        descriptor.attributes.len(),
        descriptor.actions.len()
    );
    Ok(())
}
