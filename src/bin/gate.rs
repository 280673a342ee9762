//! Schema Gate CLI
//!
//! Inspects a schema source and checks payloads against it.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use schema_gate::{AddressingStrategy, Engine, EngineConfig, FormatChecker, ResponseCheck, SchemaPath};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-gate")]
#[command(about = "Resolve schemas and validate payloads")]
struct Cli {
    /// Config file (defaults: schema-gate.toml, .schema-gate.toml, config/schema-gate.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Schema directory (flat) or API-description file (linked)
    #[arg(short, long)]
    location: Option<PathBuf>,

    /// Addressing strategy: flat or linked
    #[arg(short, long, value_parser = parse_strategy)]
    strategy: Option<AddressingStrategy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource keys
    Resources,

    /// Print the schema a path resolves to
    Resolve {
        /// Path such as users/create
        path: String,
        /// Resolve the response (target) schema instead of the request schema
        #[arg(long)]
        response: bool,
    },

    /// Validate a JSON payload file ("-" for stdin)
    Check {
        path: String,
        payload: PathBuf,
        /// Validate as a successful JSON response
        #[arg(long)]
        response: bool,
    },

    /// Print the effective configuration
    Config,
}

fn parse_strategy(s: &str) -> Result<AddressingStrategy, String> {
    match s {
        "flat" => Ok(AddressingStrategy::Flat),
        "linked" => Ok(AddressingStrategy::Linked),
        other => Err(format!("unknown strategy '{}', expected flat or linked", other)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EngineConfig::load_from(cli.config.as_deref())?
        .with_format_checker(FormatChecker::extended());
    if let Some(location) = cli.location {
        config.schema_source_location = Some(location);
    }
    if let Some(strategy) = cli.strategy {
        config.addressing_strategy = strategy;
    }

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let engine = Engine::initialize(&config)?;

    match cli.command {
        Commands::Resources => {
            let store = engine.store();
            println!(
                "📦 {} resources ({}, checksum {})",
                store.resource_keys().len(),
                engine.strategy().name(),
                store.checksum().short()
            );
            for key in store.resource_keys() {
                println!("  {}", key);
            }
            Ok(())
        }

        Commands::Resolve { path, response } => {
            let path = SchemaPath::parse(&path)?;
            let node = if response {
                engine.strategy().resolve_response(&path)?
            } else {
                engine.strategy().resolve_request(&path)?
            };
            match node {
                Some(node) => println!("{}", serde_json::to_string_pretty(node.schema.as_ref())?),
                None => println!("∅ {} has no schema (validation skipped)", path),
            }
            Ok(())
        }

        Commands::Check {
            path,
            payload,
            response,
        } => {
            let path = SchemaPath::parse(&path)?;
            let raw = read_payload(&payload)?;

            if response {
                let engine = engine.with_response_validation(true);
                match engine.validate_response(&path, 200, "application/json", &raw) {
                    ResponseCheck::Passed => println!("✅ {} response is valid", path),
                    ResponseCheck::Skipped(reason) => {
                        println!("∅ {} response not checked: {:?}", path, reason)
                    }
                    ResponseCheck::Failed(e) => bail!("❌ {} response invalid: {}", path, e),
                }
            } else {
                let body: serde_json::Value = serde_json::from_str(&raw)
                    .with_context(|| format!("{} is not valid JSON", payload.display()))?;
                engine
                    .validate_request(&path, &body)
                    .map_err(|e| anyhow!("❌ {} request invalid: {}", path, e))?;
                println!("✅ {} request is valid", path);
            }
            Ok(())
        }

        Commands::Config => Ok(()),
    }
}

fn read_payload(payload: &Path) -> anyhow::Result<String> {
    if payload.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(payload).with_context(|| format!("reading {}", payload.display()))
    }
}
