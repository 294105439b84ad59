use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sparql2sql::{config, metadata_store, PartitionRewriter};

/// sparql2sql - SPARQL to SQL over triple tables, with partition-aware rewriting
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (environment variables are used otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Metadata backend: yaml or clickhouse
    #[arg(long, global = true)]
    metadata_backend: Option<config::MetadataBackend>,

    /// YAML metadata document for the yaml backend
    #[arg(long, global = true)]
    metadata_file: Option<String>,

    /// ClickHouse URL for the clickhouse backend
    #[arg(long, global = true)]
    clickhouse_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a SPARQL SELECT query into SQL
    Translate {
        /// Query file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Print the render plan as JSON instead of SQL
        #[arg(long)]
        plan: bool,
    },
    /// Rewrite a SQL query to use partitioned tables
    Rewrite {
        /// Query file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            config_file: cli.config.clone(),
            metadata_backend: cli.metadata_backend,
            metadata_file: cli.metadata_file.clone(),
            clickhouse_url: cli.clickhouse_url.clone(),
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Translate { file, plan } => {
            let query = read_input(file.as_ref())?;
            let translation = sparql2sql::translate(&query)?;
            if *plan {
                println!("{}", serde_json::to_string_pretty(&translation.plan)?);
            } else {
                println!("{}", translation.sql);
            }
        }
        Command::Rewrite { file } => {
            let config = config::AppConfig::from_cli((&cli).into())?;
            let store = metadata_store::store_from_config(&config)?;
            let sql = read_input(file.as_ref())?;

            let outcome = PartitionRewriter::new(store.as_ref()).rewrite(sql.trim())?;
            for skipped in &outcome.skipped {
                eprintln!("skipped {}: {}", skipped.comparison, skipped.reason);
            }
            println!("{}", outcome.sql);
        }
    }
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
