//! In-memory transfer capability for testing and dry runs.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::*;
use across_types::{BridgeError, Result, TxHandle};

/// Records every transfer instead of sending it, returning synthetic hashes.
///
/// Optionally fails on the n-th call (0-based) to exercise error paths.
pub struct RecordingTransfer {
    calls: Mutex<Vec<TransferParams>>,
    handles: Mutex<Vec<TxHandle>>,
    fail_at: Option<usize>,
}

impl RecordingTransfer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
            fail_at: None,
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    /// Every call received, including the failing one.
    pub fn calls(&self) -> Vec<TransferParams> {
        self.calls.lock().unwrap().clone()
    }

    /// Handles returned for successful calls.
    pub fn handles(&self) -> Vec<TxHandle> {
        self.handles.lock().unwrap().clone()
    }
}

impl Default for RecordingTransfer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransferCapability for RecordingTransfer {
    async fn transfer(&self, params: &TransferParams) -> Result<TxHandle> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(params.clone());
            calls.len() - 1
        };
        if self.fail_at == Some(index) {
            return Err(BridgeError::Transfer(format!(
                "simulated failure on call {} to {}",
                index, params.to
            )));
        }
        let handle = format!("0x{:064x}", index + 1);
        self.handles.lock().unwrap().push(handle.clone());
        Ok(handle)
    }
}
