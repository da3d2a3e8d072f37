//! Bridge execution through an injected transfer capability.
//!
//! - Submit approval transactions, then the bridge (swap) transaction
//! - Strictly sequential; the first failure stops the run
//!
//! Signing, broadcasting and nonce management belong to the capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use across_types::{Address, Quote, Result, TransactionRequest, TxHandle};

pub mod memory;

pub use memory::RecordingTransfer;

/// Arguments handed to the transfer capability for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParams {
    pub to: Address,
    /// Native value in wei, as a decimal string.
    pub amount: String,
    pub data: String,
    pub chain_id: u64,
}

impl From<&TransactionRequest> for TransferParams {
    fn from(tx: &TransactionRequest) -> Self {
        Self {
            to: tx.to.clone(),
            amount: tx.value.clone(),
            data: tx.data.clone(),
            chain_id: tx.chain_id,
        }
    }
}

/// Sends one transaction and returns an opaque handle (typically its hash).
#[async_trait]
pub trait TransferCapability: Send + Sync {
    async fn transfer(&self, params: &TransferParams) -> Result<TxHandle>;
}

/// Adapts a plain function into a `TransferCapability`.
pub struct FnTransfer<F>(pub F);

#[async_trait]
impl<F> TransferCapability for FnTransfer<F>
where
    F: Fn(&TransferParams) -> Result<TxHandle> + Send + Sync,
{
    async fn transfer(&self, params: &TransferParams) -> Result<TxHandle> {
        (self.0)(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxLabel {
    Approval,
    Bridge,
}

impl TxLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxLabel::Approval => "approval",
            TxLabel::Bridge => "bridge",
        }
    }
}

/// A submitted transaction and the handle the capability returned for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedTx {
    pub label: TxLabel,
    pub handle: TxHandle,
}

/// Transactions a quote asks for, in submission order.
pub fn planned_transactions(quote: &Quote) -> Result<Vec<(TxLabel, TransactionRequest)>> {
    let mut planned: Vec<_> = quote
        .approval_txns()?
        .into_iter()
        .map(|tx| (TxLabel::Approval, tx))
        .collect();
    if let Some(swap) = quote.swap_tx()? {
        planned.push((TxLabel::Bridge, swap));
    }
    // Reject undecodable calldata before anything is sent.
    for (_, tx) in &planned {
        tx.calldata()?;
    }
    Ok(planned)
}

/// Submit the quote's approval transactions, then its bridge transaction.
///
/// If the capability fails, the error is returned immediately: later
/// transactions are not attempted and handles already obtained are dropped.
pub async fn execute_bridge(
    quote: &Quote,
    transfer: &dyn TransferCapability,
) -> Result<Vec<ExecutedTx>> {
    let planned = planned_transactions(quote)?;
    let mut executed = Vec::with_capacity(planned.len());

    for (label, tx) in &planned {
        let handle = transfer.transfer(&TransferParams::from(tx)).await?;
        info!(label = label.as_str(), chain_id = tx.chain_id, to = %tx.to, %handle, "transaction submitted");
        executed.push(ExecutedTx {
            label: *label,
            handle,
        });
    }

    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use across_types::BridgeError;
    use serde_json::json;

    fn quote_with(approvals: usize, swap: bool) -> Quote {
        let approvals: Vec<_> = (0..approvals)
            .map(|i| {
                json!({
                    "to": format!("0xa{}", i),
                    "data": "0x095ea7b3",
                    "chainId": 42161
                })
            })
            .collect();
        let mut body = json!({ "approvalTxns": approvals });
        if swap {
            body["swapTx"] = json!({
                "to": "0x5c7BCd6E7De5423a257D81B442095A1a6ced35C5",
                "value": "4624539426727526",
                "data": "0xad5425c6",
                "chainId": "42161"
            });
        }
        Quote::from_json(body).unwrap()
    }

    #[tokio::test]
    async fn test_approvals_then_bridge() {
        let transfer = RecordingTransfer::new();
        let executed = execute_bridge(&quote_with(2, true), &transfer).await.unwrap();

        let labels: Vec<_> = executed.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![TxLabel::Approval, TxLabel::Approval, TxLabel::Bridge]);

        let calls = transfer.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].to, "0xa0");
        assert_eq!(calls[1].to, "0xa1");
        assert_eq!(calls[2].amount, "4624539426727526");
        assert_eq!(calls[2].chain_id, 42161);
        assert_eq!(calls[0].amount, "0");

        let handles: Vec<_> = executed.iter().map(|e| e.handle.clone()).collect();
        assert_eq!(handles, transfer.handles());
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let transfer = RecordingTransfer::failing_at(0);
        let err = execute_bridge(&quote_with(2, true), &transfer).await.unwrap_err();
        assert!(matches!(err, BridgeError::Transfer(_)));
        assert_eq!(transfer.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_on_bridge_drops_handles() {
        let transfer = RecordingTransfer::failing_at(2);
        assert!(execute_bridge(&quote_with(2, true), &transfer).await.is_err());
        assert_eq!(transfer.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_and_swap_only() {
        let transfer = RecordingTransfer::new();
        assert!(execute_bridge(&quote_with(0, false), &transfer).await.unwrap().is_empty());

        let executed = execute_bridge(&quote_with(0, true), &transfer).await.unwrap();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].label, TxLabel::Bridge);
    }

    #[tokio::test]
    async fn test_malformed_tx_sends_nothing() {
        let quote = Quote::from_json(json!({
            "approvalTxns": [{"to": "0x1", "data": "0x00", "chainId": 1}],
            "swapTx": {"to": "0x2", "data": "not-hex", "chainId": 1}
        }))
        .unwrap();
        let transfer = RecordingTransfer::new();
        let err = execute_bridge(&quote, &transfer).await.unwrap_err();
        assert!(matches!(err, BridgeError::Parse(_)));
        assert!(transfer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fn_transfer() {
        let transfer = FnTransfer(|p: &TransferParams| Ok::<_, BridgeError>(format!("hash-{}", p.to)));
        let executed = execute_bridge(&quote_with(1, true), &transfer).await.unwrap();
        assert_eq!(executed[0].handle, "hash-0xa0");
        assert_eq!(
            serde_json::to_value(&executed[1]).unwrap(),
            json!({"label": "bridge", "handle": "hash-0x5c7BCd6E7De5423a257D81B442095A1a6ced35C5"})
        );
    }
}
