//! Symbol-level quoting: resolve tokens, scale the amount, fetch a quote and
//! describe the outcome as a JSON-friendly report.

use serde::Serialize;
use across_tokens::{to_smallest_unit, TokenRegistry};
use across_types::{Address, BridgeError, BridgeRequest, Quote, Result};

use crate::QuoteClient;

pub const MANUAL_BRIDGE_URL: &str = "https://across.to";

/// A bridge described with token symbols and a human-readable amount.
#[derive(Debug, Clone)]
pub struct SymbolQuery {
    pub from_chain: u64,
    pub to_chain: u64,
    pub from_token: String,
    pub to_token: String,
    /// Amount in token units, e.g. "5.0" for 5 USDC.
    pub amount: String,
    pub depositor: Option<Address>,
}

/// Successful quote summary.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub success: bool,
    pub endpoint: String,
    pub quote: Quote,
    pub input_amount: String,
    pub input_token: String,
    pub output_token: String,
    pub from_chain: String,
    pub to_chain: String,
}

/// Quote could not be fetched; explains how to bridge by hand instead.
#[derive(Debug, Clone, Serialize)]
pub struct ManualFallback {
    pub success: bool,
    pub error: String,
    pub suggestion: String,
    pub manual_steps: Vec<String>,
}

/// Query rejected, or the quote failed outside mirror mode.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BridgeReport {
    Quoted(QuoteSummary),
    Manual(ManualFallback),
    Failed(Failure),
}

impl BridgeReport {
    pub fn is_success(&self) -> bool {
        matches!(self, BridgeReport::Quoted(_))
    }

    fn failed(error: &BridgeError) -> Self {
        BridgeReport::Failed(Failure {
            success: false,
            error: error.to_string(),
        })
    }
}

impl ManualFallback {
    pub fn new(query: &SymbolQuery, from_chain: &str, to_chain: &str, error: &BridgeError) -> Self {
        let SymbolQuery { from_token, to_token, amount, .. } = query;
        Self {
            success: false,
            error: error.to_string(),
            suggestion: format!(
                "Bridge {amount} {from_token} from {from_chain} to {to_token} on {to_chain} manually at {MANUAL_BRIDGE_URL}"
            ),
            manual_steps: vec![
                format!("1. Go to {MANUAL_BRIDGE_URL}"),
                "2. Connect your wallet".to_string(),
                format!("3. Select {from_chain} → {to_chain}"),
                format!("4. Choose {from_token} → {to_token}"),
                format!("5. Enter amount: {amount}"),
                "6. Review fees and confirm bridge".to_string(),
            ],
        }
    }
}

/// Build the wire request for a symbol query using the registry.
pub fn build_request(registry: &TokenRegistry, query: &SymbolQuery) -> Result<BridgeRequest> {
    let input_token = registry.resolve_address(query.from_chain, &query.from_token)?;
    let output_token = registry.resolve_address(query.to_chain, &query.to_token)?;
    let amount = to_smallest_unit(&query.amount, &query.from_token)?;

    Ok(BridgeRequest {
        input_token: input_token.clone(),
        output_token: output_token.clone(),
        amount,
        origin_chain_id: query.from_chain,
        destination_chain_id: query.to_chain,
        depositor: query.depositor.clone(),
        recipient: query.depositor.clone(),
    })
}

/// Quote a bridge by token symbol.
///
/// Never fails. When every mirror is down the report is `Manual`, with
/// step-by-step instructions; any other problem (registry, amount, or a
/// single-endpoint quote error) is a plain `Failed`.
pub async fn quote_by_symbol(
    client: &QuoteClient,
    registry: &TokenRegistry,
    query: &SymbolQuery,
) -> BridgeReport {
    let request = match build_request(registry, query) {
        Ok(r) => r,
        Err(e) => return BridgeReport::failed(&e),
    };

    let from_chain = registry.display_name(query.from_chain);
    let to_chain = registry.display_name(query.to_chain);

    match client.get_quote(&request).await {
        Ok(fetched) => BridgeReport::Quoted(QuoteSummary {
            success: true,
            endpoint: fetched.endpoint,
            quote: fetched.quote,
            input_amount: query.amount.clone(),
            input_token: query.from_token.clone(),
            output_token: query.to_token.clone(),
            from_chain,
            to_chain,
        }),
        Err(e @ BridgeError::MirrorsExhausted { .. }) => {
            BridgeReport::Manual(ManualFallback::new(query, &from_chain, &to_chain, &e))
        }
        Err(e) => BridgeReport::failed(&e),
    }
}
