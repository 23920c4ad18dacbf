//! Recent tips and earnings, fed by session notifications

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::broadcast::{self, error::RecvError};

use crate::constant::RECENT_TIPS_LIMIT;
use crate::types::{EarningsSummary, TipStatus, TipTransaction};
use crate::units::normalize_address;

#[derive(Default)]
struct LedgerState {
    /// Newest first
    recent: Vec<TipTransaction>,
    /// Confirmed (total, count) per recipient
    earnings: HashMap<String, (f64, usize)>,
    counted: HashSet<String>,
}

/// Keeps the latest tips and per-recipient earnings
pub struct TipLedger {
    limit: usize,
    state: Mutex<LedgerState>,
}

impl Default for TipLedger {
    fn default() -> Self {
        Self::new(RECENT_TIPS_LIMIT)
    }
}

impl TipLedger {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Insert a tip or replace the entry with the same hash
    pub fn record(&self, tx: TipTransaction) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if tx.status == TipStatus::Confirmed && state.counted.insert(tx.hash.clone()) {
            let entry = state
                .earnings
                .entry(recipient_key(&tx.recipient))
                .or_insert((0.0, 0));
            entry.0 += tx.amount;
            entry.1 += 1;
        }

        match state.recent.iter().position(|t| t.hash == tx.hash) {
            Some(index) => state.recent[index] = tx,
            None => {
                state.recent.insert(0, tx);
                state.recent.truncate(self.limit);
            }
        }
    }

    /// Record every update from a session subscription until the session goes away
    pub async fn follow(&self, mut updates: broadcast::Receiver<TipTransaction>) {
        loop {
            match updates.recv().await {
                Ok(tx) => self.record(tx),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Tip ledger lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pub fn recent(&self) -> Vec<TipTransaction> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .recent
            .clone()
    }

    pub fn earnings(&self, recipient: &str) -> EarningsSummary {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let key = recipient_key(recipient);

        let (total_earnings, tip_count) = state.earnings.get(&key).copied().unwrap_or((0.0, 0));
        let average_tip = if tip_count == 0 {
            0.0
        } else {
            total_earnings / tip_count as f64
        };

        EarningsSummary {
            total_earnings,
            tip_count,
            average_tip,
            recent_tips: state
                .recent
                .iter()
                .filter(|t| t.status == TipStatus::Confirmed && recipient_key(&t.recipient) == key)
                .cloned()
                .collect(),
        }
    }
}

fn recipient_key(address: &str) -> String {
    normalize_address(address).unwrap_or_else(|| address.to_lowercase())
}
