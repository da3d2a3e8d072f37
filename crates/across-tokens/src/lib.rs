//! Static token address tables and amount scaling for Across-supported chains.
//!
//! - `TokenRegistry`: chain id -> (symbol -> address), read-only after construction
//! - Chain display names and name -> id lookup
//! - Decimal amount -> smallest-unit integer conversion

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use across_types::{Address, BridgeError, Result};

pub mod units;

pub use units::{decimals_for, to_smallest_unit};

/// Known chains: (id, display name).
const CHAINS: &[(u64, &str)] = &[
    (1, "Ethereum"),
    (8453, "Base"),
    (42161, "Arbitrum"),
    (10, "Optimism"),
    (137, "Polygon"),
];

const NATIVE: &str = "0x0000000000000000000000000000000000000000";

/// Built-in token tables: (chain id, [(symbol, address)]).
const TOKENS: &[(u64, &[(&str, &str)])] = &[
    (
        1,
        &[
            ("ETH", NATIVE),
            ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            ("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7"),
        ],
    ),
    (
        42161,
        &[
            ("ETH", NATIVE),
            ("WETH", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
            ("USDC", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831"),
            ("USDT", "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"),
        ],
    ),
    (
        8453,
        &[
            ("ETH", NATIVE),
            ("WETH", "0x4200000000000000000000000000000000000006"),
            ("USDC", "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            ("USDT", "0xfde4C96c8593536E31F229EA8f37b2ADa2699bb2"),
        ],
    ),
    (
        10,
        &[
            ("ETH", NATIVE),
            ("WETH", "0x4200000000000000000000000000000000000006"),
            ("USDC", "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85"),
            ("USDT", "0x94b008aA00579c1307B0EF2c499aD98a8ce58e58"),
        ],
    ),
];

/// Serialized form of a custom registry.
///
/// ```json
/// { "chains": { "8453": "Base" }, "tokens": { "8453": { "USDC": "0x..." } } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub chains: HashMap<u64, String>,
    #[serde(default)]
    pub tokens: HashMap<u64, HashMap<String, Address>>,
}

/// Read-only token address registry.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    chain_names: HashMap<u64, String>,
    tokens: HashMap<u64, HashMap<String, Address>>,
}

impl TokenRegistry {
    /// Build a registry from explicit tables. Symbols are upper-cased.
    pub fn new(
        chain_names: HashMap<u64, String>,
        tokens: HashMap<u64, HashMap<String, Address>>,
    ) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|(chain_id, table)| {
                let table = table
                    .into_iter()
                    .map(|(symbol, addr)| (symbol.to_uppercase(), addr))
                    .collect();
                (chain_id, table)
            })
            .collect();
        Self { chain_names, tokens }
    }

    /// The process-wide built-in registry, constructed on first use.
    pub fn builtin() -> &'static TokenRegistry {
        static BUILTIN: OnceLock<TokenRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let chain_names = CHAINS
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect();
            let tokens = TOKENS
                .iter()
                .map(|(id, table)| {
                    let table = table
                        .iter()
                        .map(|(sym, addr)| (sym.to_string(), addr.to_string()))
                        .collect();
                    (*id, table)
                })
                .collect();
            TokenRegistry::new(chain_names, tokens)
        })
    }

    /// Parse a custom registry from JSON. Chains without an explicit name
    /// fall back to the built-in display name, if any.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(json)
            .map_err(|e| BridgeError::Parse(format!("invalid token registry: {}", e)))?;
        let mut chain_names = file.chains;
        for (id, name) in CHAINS {
            chain_names.entry(*id).or_insert_with(|| name.to_string());
        }
        Ok(Self::new(chain_names, file.tokens))
    }

    /// Look up a token address. Symbol matching is case-insensitive.
    pub fn resolve_address(&self, chain_id: u64, symbol: &str) -> Result<&Address> {
        let table = self
            .tokens
            .get(&chain_id)
            .ok_or(BridgeError::UnsupportedChain(chain_id))?;
        table
            .get(&symbol.to_uppercase())
            .ok_or_else(|| BridgeError::UnsupportedToken {
                chain_id,
                chain: self.display_name(chain_id),
                symbol: symbol.to_string(),
            })
    }

    pub fn chain_name(&self, chain_id: u64) -> Option<&str> {
        self.chain_names.get(&chain_id).map(String::as_str)
    }

    /// Chain name for messages, falling back to the numeric id.
    pub fn display_name(&self, chain_id: u64) -> String {
        self.chain_name(chain_id)
            .map(str::to_string)
            .unwrap_or_else(|| chain_id.to_string())
    }

    /// Reverse lookup by display name, case-insensitive.
    pub fn chain_id_by_name(&self, name: &str) -> Option<u64> {
        self.chain_names
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_case_insensitive() {
        let reg = TokenRegistry::builtin();
        let lower = reg.resolve_address(8453, "usdc").unwrap();
        let upper = reg.resolve_address(8453, "USDC").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
    }

    #[test]
    fn test_unsupported_chain() {
        let reg = TokenRegistry::builtin();
        assert!(matches!(
            reg.resolve_address(999999, "ETH"),
            Err(BridgeError::UnsupportedChain(999999))
        ));
        // Polygon has a display name but no token table.
        assert!(matches!(
            reg.resolve_address(137, "USDC"),
            Err(BridgeError::UnsupportedChain(137))
        ));
    }

    #[test]
    fn test_unsupported_token() {
        let err = TokenRegistry::builtin().resolve_address(1, "FOO").unwrap_err();
        match &err {
            BridgeError::UnsupportedToken { chain_id, symbol, .. } => {
                assert_eq!(*chain_id, 1);
                assert_eq!(symbol, "FOO");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "token FOO not supported on Ethereum");
    }

    #[test]
    fn test_chain_names() {
        let reg = TokenRegistry::builtin();
        assert_eq!(reg.chain_name(42161), Some("Arbitrum"));
        assert_eq!(reg.chain_id_by_name("base"), Some(8453));
        assert_eq!(reg.chain_id_by_name("POLYGON"), Some(137));
        assert_eq!(reg.chain_id_by_name("solana"), None);
        assert_eq!(reg.display_name(7777), "7777");
    }

    #[test]
    fn test_from_json() {
        let reg = TokenRegistry::from_json_str(
            r#"{"tokens": {"8453": {"degen": "0x4ed4E862860beD51a9570b96d89aF5E1B0Efefed"}}}"#,
        )
        .unwrap();
        assert_eq!(
            reg.resolve_address(8453, "DEGEN").unwrap(),
            "0x4ed4E862860beD51a9570b96d89aF5E1B0Efefed"
        );
        assert_eq!(reg.chain_name(8453), Some("Base"));
        assert!(matches!(
            reg.resolve_address(1, "USDC"),
            Err(BridgeError::UnsupportedChain(1))
        ));

        assert!(matches!(
            TokenRegistry::from_json_str("{not json"),
            Err(BridgeError::Parse(_))
        ));
    }
}
