//! Shared test utilities: a scripted wallet provider
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use monad_tip::{Provider, ProviderError, SessionConfig, WalletSession};

pub const SENDER: &str = "0xABC0000000000000000000000000000000000001";
pub const SENDER_LOWER: &str = "0xabc0000000000000000000000000000000000001";
pub const RECIPIENT: &str = "0xdef0000000000000000000000000000000000002";
pub const TX_HASH: &str = "0x5e1f0c9a6b2d4e3f8a7b6c5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9b8c7d6e5f";

/// 10 MON in wei
pub const TEN_MON: &str = "0x8ac7230489e80000";
/// 1 MON in wei
pub const ONE_MON: &str = "0xde0b6b3a7640000";

type Reply = Result<Value, ProviderError>;

#[derive(Default)]
struct Script {
    once: HashMap<String, VecDeque<Reply>>,
    sticky: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
}

/// Provider answering from scripted replies and recording every call
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<Script>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet with one unlocked account holding `balance_wei`, already on the
    /// chain, accepting transfers that confirm on the first receipt poll
    pub fn wallet(balance_wei: &str) -> Self {
        let mock = Self::new();
        mock.respond("eth_requestAccounts", json!([SENDER]));
        mock.respond("eth_accounts", json!([SENDER]));
        mock.respond("wallet_switchEthereumChain", Value::Null);
        mock.respond("wallet_addEthereumChain", Value::Null);
        mock.respond("eth_getBalance", json!(balance_wei));
        mock.respond("eth_sendTransaction", json!(TX_HASH));
        mock.respond("eth_getTransactionReceipt", json!({"status": "0x1"}));
        mock
    }

    /// Reply to every call of `method` with `value`
    pub fn respond(&self, method: &str, value: Value) {
        self.script
            .lock()
            .unwrap()
            .sticky
            .insert(method.to_string(), Ok(value));
    }

    /// Fail every call of `method` with an RPC error
    pub fn fail(&self, method: &str, code: i64, message: &str) {
        self.script
            .lock()
            .unwrap()
            .sticky
            .insert(method.to_string(), Err(ProviderError::rpc(code, message)));
    }

    /// Queue a one-shot reply, used before the sticky one
    pub fn respond_once(&self, method: &str, reply: Reply) {
        self.script
            .lock()
            .unwrap()
            .once
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn delay(&self, method: &str, delay: Duration) {
        self.script
            .lock()
            .unwrap()
            .delays
            .insert(method.to_string(), delay);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.params(method).len()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn params(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        let delay = self.script.lock().unwrap().delays.get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut script = self.script.lock().unwrap();
        if let Some(reply) = script.once.get_mut(method).and_then(|queue| queue.pop_front()) {
            return reply;
        }

        script
            .sticky
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::rpc(-32601, format!("method {} not found", method))))
    }
}

pub fn test_config() -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::from_millis(10),
        ..SessionConfig::default()
    }
}

pub fn session_with(mock: &Arc<MockProvider>) -> WalletSession {
    session_with_config(mock, test_config())
}

pub fn session_with_config(mock: &Arc<MockProvider>, config: SessionConfig) -> WalletSession {
    let provider: Arc<dyn Provider> = mock.clone();
    WalletSession::new(config, Some(provider))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
