//! [`ChainGateway`] backed by `ethers`: JSON-RPC provider plus local signer.

use std::fmt;
use std::sync::Arc;

use ethers::contract::ContractError;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionReceipt, TransactionRequest, TxHash, U64, U256};

use super::bindings::{FlowMarketplace, FlowToken};
use super::{ChainError, ChainGateway, ContractAction, PreparedCall};
use crate::error::MarketError;

/// Provider with a local signing key, as used by the CLI.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Chain gateway over any `ethers` middleware stack.
pub struct EthersChainGateway<M> {
    client: Arc<M>,
    token: FlowToken<M>,
    marketplace: FlowMarketplace<M>,
}

impl<M: Middleware + 'static> EthersChainGateway<M> {
    /// Binds the token and marketplace contracts to `client`.
    #[must_use]
    pub fn new(client: Arc<M>, token: Address, marketplace: Address) -> Self {
        Self {
            token: FlowToken::new(token, Arc::clone(&client)),
            marketplace: FlowMarketplace::new(marketplace, Arc::clone(&client)),
            client,
        }
    }

    /// Address of the marketplace contract (the allowance spender).
    #[must_use]
    pub fn marketplace_address(&self) -> Address {
        self.marketplace.address()
    }
}

impl EthersChainGateway<SignerClient> {
    /// Connects to `rpc_url` with a hex-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the URL or key cannot be parsed.
    pub fn connect(
        rpc_url: &str,
        chain_id: u64,
        private_key: &str,
        token: Address,
        marketplace: Address,
    ) -> Result<Self, MarketError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| MarketError::Config(format!("invalid rpc url {rpc_url:?}: {e}")))?;
        let key = private_key.trim();
        let wallet = key
            .strip_prefix("0x")
            .unwrap_or(key)
            .parse::<LocalWallet>()
            .map_err(|e| MarketError::Config(format!("invalid wallet key: {e}")))?
            .with_chain_id(chain_id);
        tracing::info!(
            address = %ethers::utils::to_checksum(&wallet.address(), None),
            chain_id,
            "wallet loaded"
        );
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok(Self::new(client, token, marketplace))
    }

    /// Address of the local signer.
    #[must_use]
    pub fn signer_address(&self) -> Address {
        self.client.signer().address()
    }
}

impl<M: Middleware> fmt::Debug for EthersChainGateway<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthersChainGateway")
            .field("token", &self.token.address())
            .field("marketplace", &self.marketplace.address())
            .finish_non_exhaustive()
    }
}

/// Reverts are always [`ChainError::Reverted`]; everything else goes
/// through `otherwise`.
fn contract_error<M: Middleware>(
    err: ContractError<M>,
    otherwise: fn(String) -> ChainError,
) -> ChainError {
    match err {
        ContractError::Revert(data) => ChainError::Reverted(format!("revert data {data}")),
        other => otherwise(other.to_string()),
    }
}

fn ensure_mined(
    tx_hash: TxHash,
    receipt: Option<TransactionReceipt>,
) -> Result<TxHash, ChainError> {
    match receipt {
        None => Err(ChainError::Transport(format!(
            "transaction {tx_hash:#x} dropped before confirmation"
        ))),
        Some(r) if r.status == Some(U64::one()) => Ok(tx_hash),
        Some(_) => Err(ChainError::Failed { tx_hash }),
    }
}

impl<M: Middleware + 'static> ChainGateway for EthersChainGateway<M> {
    async fn allowance(&self, owner: Address) -> Result<U256, ChainError> {
        self.token
            .allowance(owner, self.marketplace.address())
            .call()
            .await
            .map_err(|e| contract_error(e, ChainError::Transport))
    }

    async fn approve(&self, amount: U256) -> Result<TxHash, ChainError> {
        let call = self.token.approve(self.marketplace.address(), amount);
        let pending = call
            .send()
            .await
            .map_err(|e| contract_error(e, ChainError::Rejected))?;
        let tx_hash = pending.tx_hash();
        tracing::info!(tx_hash = %format!("{tx_hash:#x}"), "approval sent");
        let receipt = pending
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        ensure_mined(tx_hash, receipt)
    }

    async fn simulate(
        &self,
        from: Address,
        action: ContractAction,
    ) -> Result<PreparedCall, ChainError> {
        let call = match action {
            ContractAction::Purchase { amount, seller } => {
                self.marketplace.purchase_agent(amount, seller)
            }
            ContractAction::Generate { amount } => self.marketplace.generate_agent(amount),
        }
        .from(from);

        call.call()
            .await
            .map_err(|e| contract_error(e, ChainError::Transport))?;
        let gas = call.estimate_gas().await.ok();
        let data = call
            .calldata()
            .ok_or_else(|| ChainError::Transport("simulated call has no calldata".to_string()))?;

        Ok(PreparedCall {
            action,
            from,
            to: self.marketplace.address(),
            data,
            gas,
        })
    }

    async fn submit(&self, prepared: PreparedCall) -> Result<TxHash, ChainError> {
        let mut request = TransactionRequest::new()
            .from(prepared.from)
            .to(prepared.to)
            .data(prepared.data);
        if let Some(gas) = prepared.gas {
            request = request.gas(gas);
        }

        let pending = self
            .client
            .send_transaction(request, None)
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        tracing::info!(
            tx_hash = %format!("{tx_hash:#x}"),
            function = prepared.action.function_name(),
            "transaction sent"
        );
        let receipt = pending
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        ensure_mined(tx_hash, receipt)
    }
}
