use std::time::Duration;

/// MONAD testnet chain id (10143)
pub const MONAD_TESTNET_CHAIN_ID: &str = "0x279f";
pub const MONAD_TESTNET_NAME: &str = "MONAD Testnet";
pub const MONAD_CURRENCY_NAME: &str = "MONAD";
pub const MONAD_CURRENCY_SYMBOL: &str = "MON";
pub const MONAD_DECIMALS: u8 = 18;
pub const MONAD_TESTNET_RPC_URL: &str = "https://monad-testnet.drpc.org";
pub const MONAD_TESTNET_EXPLORER_URL: &str = "https://testnet-explorer.monad.xyz";

/// Gas for a plain value transfer
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;
/// 0x9184e72a000 wei
pub const DEFAULT_GAS_PRICE_WEI: u128 = 10_000_000_000_000;

pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Keep the last N tips in the ledger
pub const RECENT_TIPS_LIMIT: usize = 5;

pub const EVENT_CHANNEL_CAPACITY: usize = 64;

// Provider error codes (EIP-1193 / JSON-RPC)
pub const CODE_USER_REJECTED: i64 = 4001;
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;
pub const CODE_INTERNAL_ERROR: i64 = -32603;

pub const RECEIPT_STATUS_SUCCESS: &str = "0x1";
