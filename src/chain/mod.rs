//! Chain layer: token allowance, approvals, and marketplace contract calls.
//!
//! [`ChainGateway`] is the narrow surface the purchase orchestrator needs
//! from the wallet connector. [`EthersChainGateway`] implements it against
//! a JSON-RPC node with a local signer; tests substitute an in-memory
//! gateway.

pub mod bindings;
pub mod ethers_gateway;

use std::future::Future;

use ethers::types::{Address, Bytes, TxHash, U256};

pub use ethers_gateway::{EthersChainGateway, SignerClient};

/// Errors from the chain layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The signer refused or the node rejected the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Simulation reverted; the transaction was never sent.
    #[error("call reverted: {0}")]
    Reverted(String),

    /// The transaction was mined but failed.
    #[error("transaction {tx_hash:#x} failed on-chain")]
    Failed {
        /// Hash of the failed transaction.
        tx_hash: TxHash,
    },

    /// RPC transport failure or dropped transaction.
    #[error("rpc error: {0}")]
    Transport(String),
}

/// A marketplace contract call that moves FLOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractAction {
    /// `purchaseAgent(amount, seller)`: pays `seller` for a workflow.
    Purchase {
        /// Price in base units.
        amount: U256,
        /// Seller receiving the payment.
        seller: Address,
    },
    /// `generateAgent(amount)`: pays the generation fee.
    Generate {
        /// Fee in base units.
        amount: U256,
    },
}

impl ContractAction {
    /// Amount of FLOW the call spends, in base units.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        match self {
            Self::Purchase { amount, .. } | Self::Generate { amount } => *amount,
        }
    }

    /// Contract function name, for logs.
    #[must_use]
    pub const fn function_name(&self) -> &'static str {
        match self {
            Self::Purchase { .. } => "purchaseAgent",
            Self::Generate { .. } => "generateAgent",
        }
    }
}

/// A simulated call, ready to be signed and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    /// What the call does.
    pub action: ContractAction,
    /// Sender.
    pub from: Address,
    /// Marketplace contract.
    pub to: Address,
    /// ABI-encoded calldata.
    pub data: Bytes,
    /// Gas estimate from the simulation, if the node returned one.
    pub gas: Option<U256>,
}

/// Allowance granted when the current one is insufficient: the largest
/// signed 256-bit integer, `2^255 - 1`.
#[must_use]
pub fn max_approval() -> U256 {
    U256::MAX >> 1
}

/// Token and marketplace contract surface used by the orchestrator.
///
/// Write operations resolve once the transaction is mined, so a returned
/// hash always refers to a successful transaction.
pub trait ChainGateway {
    /// Current allowance `owner` has granted the marketplace contract.
    fn allowance(&self, owner: Address) -> impl Future<Output = Result<U256, ChainError>> + Send;

    /// Approves the marketplace contract to spend `amount` of the owner's
    /// FLOW and waits for the approval to be mined.
    fn approve(&self, amount: U256) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// Simulates `action` from `from` against current chain state.
    fn simulate(
        &self,
        from: Address,
        action: ContractAction,
    ) -> impl Future<Output = Result<PreparedCall, ChainError>> + Send;

    /// Signs and sends a prepared call and waits for its receipt.
    fn submit(
        &self,
        prepared: PreparedCall,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;
}
