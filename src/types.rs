//! Type definitions for the tip wallet

use serde::{Deserialize, Serialize};

use crate::constant::*;

/// Native currency description, as understood by `wallet_addEthereumChain`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Static description of the target network
///
/// Serializes to exactly the parameter object `wallet_addEthereumChain` expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl ChainConfig {
    pub fn monad_testnet() -> Self {
        Self {
            chain_id: MONAD_TESTNET_CHAIN_ID.to_string(),
            chain_name: MONAD_TESTNET_NAME.to_string(),
            native_currency: NativeCurrency {
                name: MONAD_CURRENCY_NAME.to_string(),
                symbol: MONAD_CURRENCY_SYMBOL.to_string(),
                decimals: MONAD_DECIMALS,
            },
            rpc_urls: vec![MONAD_TESTNET_RPC_URL.to_string()],
            block_explorer_urls: vec![MONAD_TESTNET_EXPLORER_URL.to_string()],
        }
    }

    pub fn decimals(&self) -> u8 {
        self.native_currency.decimals
    }

    /// Explorer link for a transaction hash, if the chain lists an explorer
    pub fn explorer_tx_url(&self, hash: &str) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), hash))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::monad_testnet()
    }
}

/// An active wallet session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConnection {
    /// Lowercase hex address
    pub address: String,
    /// Cached balance in native units
    pub balance: f64,
    pub network: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TipStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TipStatus::Pending)
    }
}

/// One outgoing tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipTransaction {
    pub hash: String,
    pub amount: f64,
    pub recipient: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub status: TipStatus,
}

impl TipTransaction {
    pub fn pending(hash: String, amount: f64, recipient: String) -> Self {
        Self {
            hash,
            amount,
            recipient,
            timestamp: chrono::Utc::now().timestamp_millis(),
            status: TipStatus::Pending,
        }
    }

    /// Move out of `Pending`. Returns false (and leaves the status alone) once settled.
    pub fn settle(&mut self, status: TipStatus) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}

/// Earnings over confirmed tips to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub total_earnings: f64,
    pub tip_count: usize,
    pub average_tip: f64,
    pub recent_tips: Vec<TipTransaction>,
}
