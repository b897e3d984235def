//! Client configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). The backend base URL is the only value every command needs;
//! the chain settings default to the Base Sepolia deployment.

use std::str::FromStr;
use std::time::Duration;

use ethers::types::Address;

use crate::domain::TokenAmount;
use crate::error::MarketError;
use crate::view::Theme;

/// Default marketplace contract on Base Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x7b96aF9Bd211cBf6BA5b0dd53aa61Dc5806b6AcE";

/// Default FLOW token on Base Sepolia.
pub const DEFAULT_TOKEN_ADDRESS: &str = "0xfd6B1E6Fc2a336196D985531d455c878aCFEbB20";

/// Base Sepolia chain id.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84_532;

/// Top-level client configuration.
///
/// Loaded once at startup via [`MarketConfig::from_env`].
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Base URL for every backend call.
    pub api_url: String,

    /// JSON-RPC endpoint of the chain node.
    pub rpc_url: String,

    /// Chain id transactions are signed for.
    pub chain_id: u64,

    /// FLOW token contract.
    pub token_address: Address,

    /// Marketplace contract (allowance spender).
    pub contract_address: Address,

    /// FLOW decimals.
    pub token_decimals: u32,

    /// Fixed fee charged per generation.
    pub generation_price: TokenAmount,

    /// Rows per page in the marketplace listing.
    pub page_size: usize,

    /// Rows per page in dashboard and generator tables.
    pub table_page_size: usize,

    /// Per-request HTTP timeout; `None` waits indefinitely.
    pub http_timeout: Option<Duration>,

    /// Terminal rendering theme.
    pub theme: Theme,

    /// Hex private key of the wallet; `None` means no wallet is connected.
    pub wallet_private_key: Option<String>,

    /// Capacity of the notification bus.
    pub notification_capacity: usize,
}

impl MarketConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if an address or the generation price
    /// is set but cannot be parsed.
    pub fn from_env() -> Result<Self, MarketError> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("MARKET_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let rpc_url = std::env::var("MARKET_RPC_URL")
            .unwrap_or_else(|_| "https://sepolia.base.org".to_string());
        let chain_id = parse_env("MARKET_CHAIN_ID", BASE_SEPOLIA_CHAIN_ID);

        let token_address = parse_address("MARKET_TOKEN_ADDRESS", DEFAULT_TOKEN_ADDRESS)?;
        let contract_address = parse_address("MARKET_CONTRACT_ADDRESS", DEFAULT_CONTRACT_ADDRESS)?;
        let token_decimals = parse_env("MARKET_TOKEN_DECIMALS", 18);

        let generation_price = std::env::var("MARKET_GENERATION_PRICE")
            .unwrap_or_else(|_| "20".to_string());
        let generation_price = TokenAmount::parse(&generation_price)
            .map_err(|e| MarketError::Config(format!("MARKET_GENERATION_PRICE: {e}")))?;

        let page_size = parse_env("MARKET_PAGE_SIZE", 10usize).max(1);
        let table_page_size = parse_env("MARKET_TABLE_PAGE_SIZE", 5usize).max(1);

        let timeout_secs = parse_env("MARKET_HTTP_TIMEOUT_SECS", 30u64);
        let http_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let theme = parse_env("MARKET_THEME", Theme::Color);

        let wallet_private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let notification_capacity = parse_env("MARKET_NOTIFICATION_CAPACITY", 256usize);

        Ok(Self {
            api_url,
            rpc_url,
            chain_id,
            token_address,
            contract_address,
            token_decimals,
            generation_price,
            page_size,
            table_page_size,
            http_timeout,
            theme,
            wallet_private_key,
            notification_capacity,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses an address variable. Unlike numeric settings, a malformed
/// address is an error rather than a silent fallback.
fn parse_address(key: &str, default: &str) -> Result<Address, MarketError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    Address::from_str(raw.trim())
        .map_err(|e| MarketError::Config(format!("{key}={raw:?} is not an address: {e}")))
}
