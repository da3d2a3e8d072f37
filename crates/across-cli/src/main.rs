//! Quote a cross-chain bridge through the Across API.
//!
//! Prints a JSON report on stdout. A failed quote is still a successful run:
//! the failure, with manual bridging steps, is part of the JSON payload.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use across_quote::{quote_by_symbol, QuoteClient, QuoteConfig, SymbolQuery};
use across_tokens::TokenRegistry;

const USAGE: &str = "Usage: across-bridge <from_chain_id> <to_chain_id> <from_token> <to_token> <amount>\n\
                     Example: across-bridge 42161 8453 USDT USDC 5.0";

#[derive(Parser, Debug)]
#[command(name = "across-bridge")]
#[command(about = "Get an Across bridge quote for a token pair and amount")]
#[command(version)]
struct Cli {
    /// Origin chain (id or name, e.g. 42161 or arbitrum)
    from_chain: String,

    /// Destination chain (id or name)
    to_chain: String,

    /// Source token symbol (ETH, WETH, USDC, USDT)
    from_token: String,

    /// Destination token symbol
    to_token: String,

    /// Amount in token units, e.g. 5.0
    amount: String,

    /// Quote endpoints tried in order (replaces the built-in mirror list)
    #[arg(long = "endpoint", env = "ACROSS_QUOTE_ENDPOINTS", value_delimiter = ',')]
    endpoints: Vec<String>,

    /// Query only the primary endpoint instead of walking the mirror list
    #[arg(long)]
    single: bool,

    /// Depositor address sent with the quote request
    #[arg(long, env = "ACROSS_DEPOSITOR")]
    depositor: Option<String>,

    /// JSON file with a custom token registry
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}\n{}", e.render(), USAGE);
            process::exit(1);
        }
    };

    // Logs go to stderr so stdout stays valid JSON.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let custom_registry = match cli.tokens {
        Some(ref path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read token registry {}", path.display()))?;
            Some(TokenRegistry::from_json_str(&raw)?)
        }
        None => None,
    };
    let registry = custom_registry.as_ref().unwrap_or_else(|| TokenRegistry::builtin());

    let report = match (
        parse_chain(registry, &cli.from_chain),
        parse_chain(registry, &cli.to_chain),
    ) {
        (Some(from_chain), Some(to_chain)) => {
            let query = SymbolQuery {
                from_chain,
                to_chain,
                from_token: cli.from_token.clone(),
                to_token: cli.to_token.clone(),
                amount: cli.amount.clone(),
                depositor: cli.depositor.clone(),
            };
            let client = QuoteClient::new(build_config(&cli));
            debug!(endpoints = ?client.config().endpoints, "quoting");
            serde_json::to_value(quote_by_symbol(&client, registry, &query).await)?
        }
        (from, _) => {
            let bad = if from.is_none() { &cli.from_chain } else { &cli.to_chain };
            json!({ "success": false, "error": format!("unknown chain: {}", bad) })
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_config(cli: &Cli) -> QuoteConfig {
    let config = if cli.single {
        QuoteConfig::primary()
    } else {
        QuoteConfig::mirrors()
    };
    if cli.endpoints.is_empty() {
        config
    } else {
        config.with_endpoints(cli.endpoints.iter().cloned())
    }
}

/// Accept a numeric chain id or a chain name known to the registry.
fn parse_chain(registry: &TokenRegistry, arg: &str) -> Option<u64> {
    match arg.parse::<u64>() {
        Ok(id) => Some(id),
        Err(_) => registry.chain_id_by_name(arg),
    }
}
