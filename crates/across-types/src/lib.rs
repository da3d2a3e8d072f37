use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// 0x-prefixed EVM address. No checksum validation is performed.
pub type Address = String;

/// 0x-prefixed hex string (e.g. "0x1234...").
pub type Hex = String;

/// Opaque handle returned by a transfer capability (usually a tx hash).
pub type TxHandle = String;

/// Across client error types.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("quote service returned status {code}")]
    HttpStatus { code: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    #[error("token {symbol} not supported on {chain}")]
    UnsupportedToken { chain_id: u64, chain: String, symbol: String },

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("Across API endpoints unavailable")]
    MirrorsExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Parameters for a single bridge quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    pub input_token: Address,
    pub output_token: Address,
    /// Integer amount in the input token's smallest unit, kept as a string.
    pub amount: String,
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depositor: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
}

impl BridgeRequest {
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_empty() || !self.amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BridgeError::InvalidRequest(format!(
                "amount must be a base-10 integer string, got {:?}",
                self.amount
            )));
        }
        if self.origin_chain_id == 0 || self.destination_chain_id == 0 {
            return Err(BridgeError::InvalidRequest(
                "chain ids must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// A transaction payload carried inside a quote (`approvalTxns[]` / `swapTx`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub to: Address,
    #[serde(default = "zero_value", deserialize_with = "de_decimal_string")]
    pub value: String,
    pub data: Hex,
    #[serde(deserialize_with = "de_chain_id")]
    pub chain_id: u64,
}

fn zero_value() -> String {
    "0".to_string()
}

fn de_decimal_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(zero_value()),
        other => Err(serde::de::Error::custom(format!(
            "expected decimal string, got {}",
            other
        ))),
    }
}

fn de_chain_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid chainId: {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid chainId: {:?}", s))),
        other => Err(serde::de::Error::custom(format!("invalid chainId: {}", other))),
    }
}

impl TransactionRequest {
    /// Decode `data` into raw calldata bytes.
    pub fn calldata(&self) -> Result<Vec<u8>> {
        hex_to_bytes(&self.data)
    }
}

/// A quote as returned by the Across API.
///
/// The body is kept as an opaque JSON object. `getQuote` enriches it with
/// `fees.totalFeePct`, so callers see a slightly larger object than the
/// service returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quote(Value);

impl Quote {
    /// Wrap a JSON value; only objects are accepted.
    pub fn from_json(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(BridgeError::Parse(format!(
                "quote must be a JSON object, got {}",
                json_kind(&value)
            )));
        }
        Ok(Self(value))
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Mutable access to the `fees` object, if the quote carries one.
    pub fn fees_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.0.get_mut("fees").and_then(Value::as_object_mut)
    }

    /// `fees.totalFeePct`, once the quote has been enriched.
    pub fn total_fee_pct(&self) -> Option<f64> {
        self.0
            .get("fees")
            .and_then(|f| f.get("totalFeePct"))
            .and_then(Value::as_f64)
    }

    /// Approval transactions in submission order. Missing or null means none.
    pub fn approval_txns(&self) -> Result<Vec<TransactionRequest>> {
        match self.0.get("approvalTxns") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|e| BridgeError::Parse(format!("approvalTxns: {}", e))),
        }
    }

    pub fn swap_tx(&self) -> Result<Option<TransactionRequest>> {
        match self.0.get("swapTx") {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| BridgeError::Parse(format!("swapTx: {}", e))),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a hex string to a byte array.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(hex_str).map_err(|e| BridgeError::Parse(format!("invalid hex: {}", e)))
}
