//! Session configuration from environment variables
//!
//! Controls the provider endpoint, receipt polling and transfer gas settings.
//! Defaults target the MONAD testnet.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constant::{DEFAULT_GAS_PRICE_WEI, RECEIPT_POLL_INTERVAL, TRANSFER_GAS_LIMIT};
use crate::types::ChainConfig;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub chain: ChainConfig,
    /// Provider endpoint. `None` means no provider is available.
    pub rpc_url: Option<String>,
    pub poll_interval: Duration,
    /// Give up on a receipt after this many empty polls. `None` polls forever.
    pub max_receipt_polls: Option<u32>,
    pub gas_limit: u64,
    pub gas_price_wei: u128,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::monad_testnet(),
            rpc_url: None,
            poll_interval: RECEIPT_POLL_INTERVAL,
            max_receipt_polls: None,
            gas_limit: TRANSFER_GAS_LIMIT,
            gas_price_wei: DEFAULT_GAS_PRICE_WEI,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `MONAD_RPC_URL`: provider endpoint (unset: no provider)
    /// - `TIP_POLL_INTERVAL_MS`: receipt poll interval, default 5000
    /// - `TIP_MAX_RECEIPT_POLLS`: poll bound, default unbounded
    /// - `TIP_GAS_LIMIT`: default 21000
    /// - `TIP_GAS_PRICE_WEI`: default 10000000000000
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let rpc_url = lookup("MONAD_RPC_URL").filter(|url| !url.trim().is_empty());
        match &rpc_url {
            Some(url) => log::info!("Provider endpoint: {}", url),
            None => log::warn!("MONAD_RPC_URL not set, no wallet provider available"),
        }

        let poll_interval = parse_var(&lookup, "TIP_POLL_INTERVAL_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let max_receipt_polls = parse_var::<u32>(&lookup, "TIP_MAX_RECEIPT_POLLS").filter(|n| *n > 0);

        let gas_limit = parse_var(&lookup, "TIP_GAS_LIMIT").unwrap_or(defaults.gas_limit);
        let gas_price_wei = parse_var(&lookup, "TIP_GAS_PRICE_WEI").unwrap_or(defaults.gas_price_wei);

        log::info!(
            "Receipt polling every {:?}, bound: {}",
            poll_interval,
            max_receipt_polls
                .map(|n| n.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        Self {
            chain: defaults.chain,
            rpc_url,
            poll_interval,
            max_receipt_polls,
            gas_limit,
            gas_price_wei,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid {}={}, using default", key, raw);
            None
        }
    }
}
