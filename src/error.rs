//! Error types for the tip wallet

use thiserror::Error;

use crate::constant::{CODE_INTERNAL_ERROR, CODE_USER_REJECTED};

/// Main error type for wallet session operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("No wallet provider found. Install a Web3 wallet or set MONAD_RPC_URL")]
    ProviderUnavailable,

    #[error("No accounts found. Please unlock your wallet")]
    NoAccounts,

    #[error("Failed to switch to the target chain: {0}")]
    ChainSwitchFailed(String),

    #[error("Wallet not connected. Please connect your wallet first")]
    NotConnected,

    #[error("Invalid tip amount: {0}. Amount must be greater than 0")]
    InvalidAmount(f64),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Insufficient funds. Balance: {balance:.4} MON, Required: {required} MON")]
    InsufficientFunds { balance: f64, required: f64 },

    #[error("Transaction rejected by user")]
    UserRejected,

    #[error("Network error: {0}. Please check your connection and try again")]
    NetworkError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Receipt polling failed: {0}")]
    PollError(String),
}

/// Error reported by a wallet provider, before any interpretation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        ProviderError::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ProviderError::Rpc { message, .. } => message.clone(),
            ProviderError::Transport(message) | ProviderError::Malformed(message) => {
                message.clone()
            }
        }
    }

    /// Classify a failed `eth_sendTransaction`
    pub(crate) fn into_send_error(self, balance: f64, required: f64) -> WalletError {
        match &self {
            ProviderError::Rpc { code, .. } if *code == CODE_USER_REJECTED => {
                WalletError::UserRejected
            }
            ProviderError::Rpc { code, message } if *code == CODE_INTERNAL_ERROR => {
                WalletError::NetworkError(message.clone())
            }
            ProviderError::Transport(message) => WalletError::NetworkError(message.clone()),
            _ if self.message().to_lowercase().contains("insufficient funds") => {
                WalletError::InsufficientFunds { balance, required }
            }
            _ => WalletError::TransactionFailed(self.message()),
        }
    }

    /// Classify a failed read (accounts, balance)
    pub(crate) fn into_read_error(self) -> WalletError {
        match self {
            ProviderError::Rpc { code, .. } if code == CODE_USER_REJECTED => {
                WalletError::UserRejected
            }
            ProviderError::Transport(message) => WalletError::NetworkError(message),
            other => WalletError::NetworkError(other.message()),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, WalletError>;
