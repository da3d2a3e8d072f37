//! Quote retrieval from the Across bridge API.
//!
//! - Query a single primary endpoint, or walk an ordered mirror list
//! - Enrich quotes with `fees.totalFeePct`
//! - Symbol-level quoting with manual-bridge guidance when every mirror fails

use serde::{Deserialize, Serialize};
use across_types::Quote;
use std::time::Duration;

pub mod fees;
pub mod quote_client;
pub mod report;

pub use quote_client::QuoteClient;
pub use report::{quote_by_symbol, BridgeReport, SymbolQuery};

pub const PRIMARY_ENDPOINT: &str = "https://app.across.to/api/swap";

/// Mirror endpoints tried in order by the fallback configuration.
/// None of these is guaranteed to be live.
pub const MIRROR_ENDPOINTS: &[&str] = &[
    "https://across.to/api/swap/quote",
    "https://app.across.to/api/swap/quote",
    "https://api.across.to/swap/quote",
    "https://across.to/_functions/api/swap/quote",
];

/// Name of the query parameter carrying the input amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountParam {
    #[serde(rename = "amount")]
    Amount,
    #[serde(rename = "inputAmount")]
    InputAmount,
}

impl AmountParam {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountParam::Amount => "amount",
            AmountParam::InputAmount => "inputAmount",
        }
    }
}

/// Quote client configuration.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Endpoints in priority order. Without `fallback` only the first is used.
    pub endpoints: Vec<String>,
    /// Try every endpoint in order and stop at the first HTTP 200.
    pub fallback: bool,
    pub request_timeout_ms: u64,
    pub mirror_timeout_ms: u64,
    pub amount_param: AmountParam,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self::primary()
    }
}

impl QuoteConfig {
    pub fn primary() -> Self {
        Self {
            endpoints: vec![PRIMARY_ENDPOINT.to_string()],
            fallback: false,
            request_timeout_ms: 30_000,
            mirror_timeout_ms: 10_000,
            amount_param: AmountParam::Amount,
        }
    }

    pub fn mirrors() -> Self {
        Self {
            endpoints: MIRROR_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            fallback: true,
            amount_param: AmountParam::InputAmount,
            ..Self::primary()
        }
    }

    /// Replace the endpoint list, keeping the other settings.
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub(crate) fn mirror_timeout(&self) -> Duration {
        Duration::from_millis(self.mirror_timeout_ms)
    }
}

/// A quote together with the endpoint that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedQuote {
    pub endpoint: String,
    pub quote: Quote,
}
