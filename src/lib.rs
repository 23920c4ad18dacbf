//! MONAD Tip Library
//!
//! Wallet session and tip transaction lifecycle for the MONAD testnet: connect a
//! wallet provider, switch it to the chain, send native-currency tips and get
//! notified when they settle.
//!
//! # Example
//!
//! ```rust,no_run
//! use monad_tip::{SessionConfig, TipStatus, WalletSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = WalletSession::from_config(SessionConfig::from_env())?;
//! let mut updates = session.subscribe();
//!
//! session.connect().await?;
//! let tip = session
//!     .send_tip("0x742d35cc6634c0532925a3b8d4c2c4e4c4c4c4c4", 1.0)
//!     .await?;
//!
//! let settled = updates.recv().await?;
//! assert_eq!(settled.hash, tip.hash);
//! assert_ne!(settled.status, TipStatus::Pending);
//! # Ok(())
//! # }
//! ```

// Internal modules (not part of public API)
mod constant;
mod monitor;

pub mod error;
pub mod types;
pub mod units;

// Modules that depend on public modules
pub mod config;
pub mod ledger;
pub mod provider;
pub mod session;

// Re-export main types for convenience
pub use config::SessionConfig;
pub use error::{ProviderError, Result, WalletError};
pub use ledger::TipLedger;
pub use provider::{HttpProvider, Provider};
pub use session::WalletSession;
pub use types::{ChainConfig, EarningsSummary, NativeCurrency, TipStatus, TipTransaction, WalletConnection};
