//! Wallet session: connection state, chain switching and tip submission

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::{json, Value};
use tokio::sync::{broadcast, Mutex};

use crate::config::SessionConfig;
use crate::constant::{CODE_UNRECOGNIZED_CHAIN, EVENT_CHANNEL_CAPACITY};
use crate::error::{ProviderError, Result, WalletError};
use crate::monitor::{ReceiptMonitor, TipRegistry};
use crate::provider::{methods, HttpProvider, Provider};
use crate::types::{ChainConfig, TipTransaction, WalletConnection};
use crate::units::{
    from_smallest_unit, normalize_address, parse_hex_quantity, to_hex_quantity, to_smallest_unit,
};

/// Wallet session for tipping on the configured chain
///
/// Owns the connection to a wallet [`Provider`], the active [`ChainConfig`],
/// and the tips submitted through it. Construct one per application and share
/// it behind an `Arc`; every method takes `&self`.
///
/// Status changes of submitted tips are broadcast to every receiver obtained
/// from [`WalletSession::subscribe`].
///
/// # Example
///
/// ```rust,no_run
/// use monad_tip::{SessionConfig, WalletSession};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = WalletSession::from_config(SessionConfig::from_env())?;
/// let mut updates = session.subscribe();
///
/// let wallet = session.connect().await?;
/// println!("Connected {} with {} MON", wallet.address, wallet.balance);
///
/// let tip = session
///     .send_tip("0x742d35cc6634c0532925a3b8d4c2c4e4c4c4c4c4", 2.5)
///     .await?;
/// println!("Tip pending: {}", tip.hash);
///
/// let settled = updates.recv().await?;
/// println!("Tip {} is now {:?}", settled.hash, settled.status);
/// # Ok(())
/// # }
/// ```
pub struct WalletSession {
    config: SessionConfig,
    provider: Option<Arc<dyn Provider>>,
    connection: RwLock<Option<WalletConnection>>,
    /// Serializes account requests and holds the last connect outcome
    connect_gate: Mutex<Option<Result<WalletConnection>>>,
    connect_attempts: AtomicU64,
    registry: TipRegistry,
    events: broadcast::Sender<TipTransaction>,
}

impl WalletSession {
    /// Create a session around an explicit provider (`None` when no wallet is present)
    pub fn new(config: SessionConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            config,
            provider,
            connection: RwLock::new(None),
            connect_gate: Mutex::new(None),
            connect_attempts: AtomicU64::new(0),
            registry: TipRegistry::default(),
            events,
        }
    }

    /// Create a session using the JSON-RPC endpoint from the config, if any
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        let provider = match &config.rpc_url {
            Some(url) => {
                let http = HttpProvider::new(url.clone())
                    .map_err(|e| WalletError::NetworkError(e.to_string()))?;
                Some(Arc::new(http) as Arc<dyn Provider>)
            }
            None => None,
        };

        Ok(Self::new(config, provider))
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.config.chain
    }

    /// Connect the wallet and switch it to the configured chain
    ///
    /// Asks the provider for account access, switches (adding the chain first
    /// if the wallet does not know it) and reads the balance of the first
    /// account. A call made while another connect is in flight waits for that
    /// one and returns its outcome instead of prompting the wallet again.
    ///
    /// # Errors
    /// * `WalletError::ProviderUnavailable` - No provider configured
    /// * `WalletError::NoAccounts` - The wallet returned no accounts
    /// * `WalletError::ChainSwitchFailed` - The wallet could not be moved to the chain
    pub async fn connect(&self) -> Result<WalletConnection> {
        let seen = self.connect_attempts.load(Ordering::SeqCst);
        let mut last_outcome = self.connect_gate.lock().await;

        if self.connect_attempts.load(Ordering::SeqCst) != seen {
            if let Some(outcome) = last_outcome.as_ref() {
                log::debug!("Sharing result of concurrent connect");
                return outcome.clone();
            }
        }

        let outcome = self.connect_with_prompt().await;
        if let Err(e) = &outcome {
            log::warn!("Wallet connection failed: {}", e);
        }

        *last_outcome = Some(outcome.clone());
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        outcome
    }

    /// Resume a session for an already-authorized account, without prompting
    ///
    /// Returns `Ok(None)` and stays disconnected if the wallet has not
    /// authorized any account yet.
    pub async fn restore(&self) -> Result<Option<WalletConnection>> {
        let _gate = self.connect_gate.lock().await;

        let accounts = self.authorized_accounts().await?;
        match accounts.into_iter().next() {
            Some(address) => self.open(address).await.map(Some),
            None => {
                log::info!("No authorized accounts to restore");
                Ok(None)
            }
        }
    }

    /// Accounts the wallet has already authorized (`eth_accounts`)
    pub async fn authorized_accounts(&self) -> Result<Vec<String>> {
        let provider = self.provider()?;
        request_account_list(provider.as_ref(), methods::ACCOUNTS).await
    }

    /// Forget the connection. Tips already submitted keep being monitored.
    pub fn disconnect(&self) {
        let mut connection = self.connection.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = connection.take() {
            log::info!("Wallet {} disconnected (local state cleared)", previous.address);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn current_address(&self) -> Option<String> {
        self.connection().map(|connection| connection.address)
    }

    pub fn connection(&self) -> Option<WalletConnection> {
        self.connection
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Re-read the connected account's balance and update the cached value
    pub async fn refresh_balance(&self) -> Result<f64> {
        let address = self.current_address().ok_or(WalletError::NotConnected)?;
        let provider = self.provider()?;

        let balance = self.fetch_balance(provider.as_ref(), &address).await?;
        self.cache_balance(&address, balance);
        Ok(balance)
    }

    /// Send `amount` of the native currency to `recipient`
    ///
    /// Returns as soon as the wallet accepts the transfer. The returned tip is
    /// `Pending`; its settlement is delivered to subscribers.
    ///
    /// # Arguments
    /// * `recipient` - `0x`-prefixed 20-byte address
    /// * `amount` - Amount in native units (MON, not wei)
    ///
    /// # Errors
    /// * `WalletError::NotConnected` - `connect` has not succeeded
    /// * `WalletError::InvalidAmount` - Amount is not positive, not finite or below one wei
    /// * `WalletError::InvalidRecipient` - Recipient is not a valid address
    /// * `WalletError::InsufficientFunds` - Balance does not cover the amount
    /// * `WalletError::UserRejected` - The transfer was declined in the wallet
    /// * `WalletError::NetworkError` - RPC or transport failure
    /// * `WalletError::TransactionFailed` - Any other provider failure
    pub async fn send_tip(&self, recipient: &str, amount: f64) -> Result<TipTransaction> {
        let from = self.current_address().ok_or(WalletError::NotConnected)?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        // Amounts below one smallest unit round to a zero-value transfer
        let value = to_smallest_unit(amount, self.config.chain.decimals())?;
        if value == 0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        let to = normalize_address(recipient)
            .ok_or_else(|| WalletError::InvalidRecipient(recipient.to_string()))?;
        let provider = self.provider()?;

        // Advisory only: the chain can still reject the transfer afterwards
        let balance = match self.fetch_balance(provider.as_ref(), &from).await {
            Ok(balance) => {
                self.cache_balance(&from, balance);
                balance
            }
            Err(e) => {
                log::warn!("Balance re-check failed, using cached balance: {}", e);
                self.connection().map(|c| c.balance).unwrap_or(0.0)
            }
        };

        if balance < amount {
            return Err(WalletError::InsufficientFunds {
                balance,
                required: amount,
            });
        }

        let params = json!([{
            "from": from,
            "to": to,
            "value": to_hex_quantity(value),
            "gas": to_hex_quantity(self.config.gas_limit as u128),
            "gasPrice": to_hex_quantity(self.config.gas_price_wei),
        }]);

        log::info!(
            "Sending tip of {} {} to {}",
            amount,
            self.config.chain.native_currency.symbol,
            to
        );

        let result = provider
            .request(methods::SEND_TRANSACTION, params)
            .await
            .map_err(|e| {
                log::warn!("Tip transaction failed: {}", e);
                e.into_send_error(balance, amount)
            })?;

        let hash = result
            .as_str()
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| {
                WalletError::TransactionFailed(format!("missing transaction hash in {}", result))
            })?
            .to_string();

        let tip = TipTransaction::pending(hash.clone(), amount, to);
        self.registry.insert(tip.clone());

        ReceiptMonitor {
            provider: Arc::clone(provider),
            registry: self.registry.clone(),
            events: self.events.clone(),
            poll_interval: self.config.poll_interval,
            max_polls: self.config.max_receipt_polls,
        }
        .spawn(hash);

        Ok(tip)
    }

    /// Receive a snapshot each time a tip settles. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<TipTransaction> {
        self.events.subscribe()
    }

    /// Latest known state of a tip sent through this session
    pub fn transaction(&self, hash: &str) -> Option<TipTransaction> {
        self.registry.get(hash)
    }

    /// All tips sent through this session, newest first
    pub fn transactions(&self) -> Vec<TipTransaction> {
        self.registry.all()
    }

    fn provider(&self) -> Result<&Arc<dyn Provider>> {
        self.provider.as_ref().ok_or(WalletError::ProviderUnavailable)
    }

    async fn connect_with_prompt(&self) -> Result<WalletConnection> {
        let provider = self.provider()?;

        let accounts = request_account_list(provider.as_ref(), methods::REQUEST_ACCOUNTS).await?;
        let address = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;

        self.open(address).await
    }

    /// Switch chain, read the balance and store the connection
    async fn open(&self, address: String) -> Result<WalletConnection> {
        let provider = self.provider()?;

        self.switch_chain(provider.as_ref()).await?;

        let balance = match self.fetch_balance(provider.as_ref(), &address).await {
            Ok(balance) => balance,
            Err(e) => {
                log::warn!("Failed to get balance for {}: {}", address, e);
                0.0
            }
        };

        let connection = WalletConnection {
            address,
            balance,
            network: self.config.chain.chain_name.clone(),
        };

        *self.connection.write().unwrap_or_else(|e| e.into_inner()) = Some(connection.clone());
        log::info!(
            "Connected {} on {} ({} {})",
            connection.address,
            connection.network,
            connection.balance,
            self.config.chain.native_currency.symbol
        );

        Ok(connection)
    }

    async fn switch_chain(&self, provider: &dyn Provider) -> Result<()> {
        let chain = &self.config.chain;
        let params = json!([{ "chainId": chain.chain_id }]);

        match provider.request(methods::SWITCH_CHAIN, params.clone()).await {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(CODE_UNRECOGNIZED_CHAIN) => {
                log::info!("{} not known to the wallet, adding it", chain.chain_name);

                provider
                    .request(methods::ADD_CHAIN, json!([chain]))
                    .await
                    .map_err(|e| WalletError::ChainSwitchFailed(format!("add chain: {}", e)))?;

                provider
                    .request(methods::SWITCH_CHAIN, params)
                    .await
                    .map_err(|e| WalletError::ChainSwitchFailed(e.to_string()))?;

                Ok(())
            }
            Err(e) => Err(WalletError::ChainSwitchFailed(e.to_string())),
        }
    }

    async fn fetch_balance(&self, provider: &dyn Provider, address: &str) -> Result<f64> {
        let raw = provider
            .request(methods::GET_BALANCE, json!([address, "latest"]))
            .await
            .map_err(ProviderError::into_read_error)?;

        let quantity = raw.as_str().ok_or_else(|| {
            WalletError::NetworkError(format!("unexpected balance response: {}", raw))
        })?;
        let wei = parse_hex_quantity(quantity).map_err(ProviderError::into_read_error)?;

        Ok(from_smallest_unit(wei, self.config.chain.decimals()))
    }

    fn cache_balance(&self, address: &str, balance: f64) {
        let mut connection = self.connection.write().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = connection.as_mut().filter(|c| c.address == address) {
            current.balance = balance;
        }
    }
}

async fn request_account_list(provider: &dyn Provider, method: &str) -> Result<Vec<String>> {
    let result = provider
        .request(method, json!([]))
        .await
        .map_err(ProviderError::into_read_error)?;

    let accounts = match result {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|address| address.to_lowercase())
            .collect(),
        other => {
            return Err(WalletError::NetworkError(format!(
                "unexpected accounts response: {}",
                other
            )))
        }
    };

    Ok(accounts)
}
