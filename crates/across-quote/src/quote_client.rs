//! HTTP client for the Across quote service.
//!
//! Endpoints:
//! - GET /api/swap (primary)
//! - GET <mirror>/swap/quote (fallback list)

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use across_types::{BridgeError, BridgeRequest, Quote, Result};

use crate::{fees, FetchedQuote, QuoteConfig};

/// Quote client for the Across API.
pub struct QuoteClient {
    config: QuoteConfig,
    client: reqwest::Client,
}

impl QuoteClient {
    pub fn new(config: QuoteConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.request_timeout())
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Fetch a quote and enrich it with `fees.totalFeePct`.
    ///
    /// Without fallback only the first endpoint is queried and its failure is
    /// returned as-is. With fallback every endpoint is tried in order, each
    /// with the shorter mirror timeout, and the first HTTP 200 wins; if none
    /// answers the result is `MirrorsExhausted`.
    pub async fn get_quote(&self, request: &BridgeRequest) -> Result<FetchedQuote> {
        request.validate()?;

        let first = self
            .config
            .endpoints
            .first()
            .ok_or_else(|| BridgeError::InvalidRequest("no quote endpoints configured".into()))?;

        if !self.config.fallback {
            let quote = self
                .fetch(first, request, self.config.request_timeout())
                .await?;
            return Ok(FetchedQuote {
                endpoint: first.clone(),
                quote,
            });
        }

        for endpoint in &self.config.endpoints {
            match self
                .fetch(endpoint, request, self.config.mirror_timeout())
                .await
            {
                Ok(quote) => {
                    return Ok(FetchedQuote {
                        endpoint: endpoint.clone(),
                        quote,
                    })
                }
                Err(e) => warn!(%endpoint, error = %e, "quote endpoint failed"),
            }
        }

        let attempts = self.config.endpoints.len();
        warn!(attempts, "all quote endpoints failed");
        Err(BridgeError::MirrorsExhausted { attempts })
    }

    /// GET <url>?inputToken=..&outputToken=..&amount=..&originChainId=..&destinationChainId=..
    async fn fetch(&self, url: &str, request: &BridgeRequest, timeout: Duration) -> Result<Quote> {
        debug!(%url, amount = %request.amount, "requesting quote");

        let resp = self
            .client
            .get(url)
            .query(&self.query_params(request))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| BridgeError::Network(format!("quote request failed: {}", e)))?;

        let status = resp.status();
        let accepted = if self.config.fallback {
            status == StatusCode::OK
        } else {
            status.is_success()
        };
        if !accepted {
            return Err(BridgeError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| BridgeError::Network(format!("failed to read quote body: {}", e)))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| BridgeError::Parse(format!("failed to parse quote response: {}", e)))?;

        let mut quote = Quote::from_json(json)?;
        match fees::annotate_fee_pct(&mut quote, &request.amount) {
            Ok(_) => {}
            // A mirror answering 200 wins even when its fee block is unreadable.
            Err(e) if self.config.fallback => {
                warn!(%url, error = %e, "quote kept without fee percentage")
            }
            Err(e) => return Err(e),
        }
        Ok(quote)
    }

    fn query_params(&self, request: &BridgeRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("inputToken", request.input_token.clone()),
            ("outputToken", request.output_token.clone()),
            (self.config.amount_param.as_str(), request.amount.clone()),
            ("originChainId", request.origin_chain_id.to_string()),
            ("destinationChainId", request.destination_chain_id.to_string()),
        ];
        if let Some(ref depositor) = request.depositor {
            params.push(("depositor", depositor.clone()));
        }
        if let Some(ref recipient) = request.recipient {
            params.push(("recipient", recipient.clone()));
        }
        params
    }
}
