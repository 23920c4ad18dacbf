//! Receipt polling for submitted tips

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::constant::RECEIPT_STATUS_SUCCESS;
use crate::error::WalletError;
use crate::provider::{methods, Provider};
use crate::types::{TipStatus, TipTransaction};

/// Tips submitted in this session, keyed by hash
#[derive(Clone, Default)]
pub(crate) struct TipRegistry {
    inner: Arc<RwLock<HashMap<String, TipTransaction>>>,
}

impl TipRegistry {
    pub fn insert(&self, tx: TipTransaction) {
        let mut tips = self.inner.write().unwrap_or_else(|e| e.into_inner());
        tips.insert(tx.hash.clone(), tx);
    }

    pub fn get(&self, hash: &str) -> Option<TipTransaction> {
        let tips = self.inner.read().unwrap_or_else(|e| e.into_inner());
        tips.get(hash).cloned()
    }

    pub fn all(&self) -> Vec<TipTransaction> {
        let tips = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<TipTransaction> = tips.values().cloned().collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all
    }

    /// Settle a tracked tip. Returns the updated snapshot only if it actually moved.
    pub fn settle(&self, hash: &str, status: TipStatus) -> Option<TipTransaction> {
        let mut tips = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let tx = tips.get_mut(hash)?;
        if tx.settle(status) {
            Some(tx.clone())
        } else {
            None
        }
    }
}

pub(crate) struct ReceiptMonitor {
    pub provider: Arc<dyn Provider>,
    pub registry: TipRegistry,
    pub events: broadcast::Sender<TipTransaction>,
    pub poll_interval: Duration,
    pub max_polls: Option<u32>,
}

impl ReceiptMonitor {
    /// Watch `hash` in the background until it settles
    pub fn spawn(self, hash: String) -> JoinHandle<Option<TipTransaction>> {
        tokio::spawn(async move { self.run(&hash).await })
    }

    async fn run(&self, hash: &str) -> Option<TipTransaction> {
        let status = match self.wait_for_receipt(hash).await {
            Ok(status) => status,
            Err(e) => {
                log::warn!("Tip {} marked failed: {}", hash, e);
                TipStatus::Failed
            }
        };

        let settled = self.registry.settle(hash, status)?;
        log::info!("Tip {} settled as {:?}", hash, settled.status);

        if self.events.send(settled.clone()).is_err() {
            log::debug!("No subscribers for update of {}", hash);
        }

        Some(settled)
    }

    async fn wait_for_receipt(&self, hash: &str) -> Result<TipStatus, WalletError> {
        let mut polls: u32 = 0;

        loop {
            let receipt = self
                .provider
                .request(methods::GET_TRANSACTION_RECEIPT, json!([hash]))
                .await
                .map_err(|e| WalletError::PollError(e.to_string()))?;
            polls += 1;

            if !receipt.is_null() {
                return Ok(receipt_status(&receipt));
            }

            if let Some(max) = self.max_polls {
                if polls >= max {
                    return Err(WalletError::PollError(format!(
                        "no receipt after {} polls",
                        polls
                    )));
                }
            }

            log::debug!("Tip {} still pending (poll {})", hash, polls);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn receipt_status(receipt: &Value) -> TipStatus {
    match receipt["status"].as_str() {
        Some(RECEIPT_STATUS_SUCCESS) => TipStatus::Confirmed,
        _ => TipStatus::Failed,
    }
}
