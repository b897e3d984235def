//! Shared application state for CLI commands.

use std::sync::Arc;

use crate::api::MarketApiClient;
use crate::chain::{EthersChainGateway, SignerClient};
use crate::config::MarketConfig;
use crate::domain::{NotificationBus, WalletAddress, WalletSession};
use crate::error::MarketError;
use crate::service::{MarketService, PurchaseOrchestrator};

/// Orchestrator wired to the live chain and backend.
pub type LiveOrchestrator = PurchaseOrchestrator<EthersChainGateway<SignerClient>, MarketApiClient>;

/// Everything a command needs, built once from [`MarketConfig`].
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<MarketConfig>,
    /// Wallet connection, derived from the configured key.
    pub session: WalletSession,
    /// Notification bus shared by all services.
    pub bus: NotificationBus,
    /// Page loading, listings, downloads.
    pub market: MarketService,
    /// Paid flows; `None` when no wallet key is configured.
    pub orchestrator: Option<Arc<LiveOrchestrator>>,
}

impl AppState {
    /// Builds the HTTP client, the optional signer, and the services.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the API URL, RPC URL or wallet key
    /// cannot be parsed, or [`MarketError::Request`] if the HTTP client
    /// cannot be built.
    pub fn from_config(config: MarketConfig) -> Result<Self, MarketError> {
        let bus = NotificationBus::new(config.notification_capacity);
        let api = MarketApiClient::new(&config.api_url, config.http_timeout)?;
        let market = MarketService::new(
            api.clone(),
            bus.clone(),
            config.page_size,
            config.table_page_size,
        );

        let (session, orchestrator) = match config.wallet_private_key.as_deref() {
            Some(key) => {
                let gateway = EthersChainGateway::connect(
                    &config.rpc_url,
                    config.chain_id,
                    key,
                    config.token_address,
                    config.contract_address,
                )?;
                let session =
                    WalletSession::connected(WalletAddress::new(gateway.signer_address()));
                let orchestrator = PurchaseOrchestrator::new(
                    gateway,
                    api,
                    bus.clone(),
                    config.token_decimals,
                    config.generation_price.clone(),
                );
                (session, Some(Arc::new(orchestrator)))
            }
            None => {
                tracing::info!("no wallet key configured; read-only session");
                (WalletSession::disconnected(), None)
            }
        };

        Ok(Self {
            config: Arc::new(config),
            session,
            bus,
            market,
            orchestrator,
        })
    }

    /// The orchestrator, or [`MarketError::WalletNotConnected`].
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`] when no wallet key is
    /// configured.
    pub fn orchestrator(&self) -> Result<&LiveOrchestrator, MarketError> {
        self.orchestrator
            .as_deref()
            .ok_or(MarketError::WalletNotConnected)
    }
}
