//! Wallet provider abstraction
//!
//! A provider is anything that answers EIP-1193 style `request({method, params})`
//! calls: a browser-injected wallet bridged into Rust, or a JSON-RPC node
//! that manages unlocked accounts. Errors come back as [`ProviderError`], never
//! as loosely typed values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ProviderError;

pub mod methods {
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
    pub const GET_BALANCE: &str = "eth_getBalance";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue one request. `params` is the positional parameter array.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// JSON-RPC 2.0 over HTTP
///
/// Forwards every method verbatim to the endpoint, so the node behind it must
/// understand the wallet methods it is asked for (account management and
/// `eth_sendTransaction` signing).
pub struct HttpProvider {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        log::debug!("-> {} #{} {}", method, id, params);

        let response = self.client.post(&self.url).json(&body).send().await?;
        let result: Value = response.json().await?;

        log::debug!("<- {} #{} {}", method, id, result);

        parse_response(result)
    }
}

/// Turn a JSON-RPC response envelope into the result or a typed error
pub fn parse_response(mut response: Value) -> Result<Value, ProviderError> {
    if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
        return Err(ProviderError::Rpc {
            code: error["code"].as_i64().unwrap_or(0),
            message: error["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string(),
        });
    }

    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ProviderError::Malformed(
            "response has neither result nor error".to_string(),
        )),
    }
}
