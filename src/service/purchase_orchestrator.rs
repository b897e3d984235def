//! Purchase orchestrator: allowance, approval, contract call, settlement.

use chrono::Utc;
use ethers::types::{TxHash, U256};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::api::MarketBackend;
use crate::api::dto::{GenerateRequest, PurchaseRequest};
use crate::chain::{ChainGateway, ContractAction, max_approval};
use crate::domain::{
    GenerationPrompt, MarketEvent, NotificationBus, TokenAmount, WalletAddress, WalletSession,
    Workflow,
};
use crate::error::MarketError;

/// Transactions sent by a completed orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrchestrationReceipt {
    /// Approval hash, if the allowance had to be raised.
    pub approval_tx: Option<TxHash>,
    /// Purchase or generation fee hash.
    pub action_tx: TxHash,
}

/// Drives paid marketplace actions end to end.
///
/// Every action follows the same sequence: check allowance → approve if
/// short → simulate → submit → tell the backend → emit events. A failure
/// at any step aborts the rest and emits [`MarketEvent::OperationFailed`].
/// Nothing is rolled back or retried.
#[derive(Debug)]
pub struct PurchaseOrchestrator<C, B> {
    chain: C,
    backend: B,
    bus: NotificationBus,
    token_decimals: u32,
    generation_price: TokenAmount,
    in_flight: Mutex<()>,
}

impl<C: ChainGateway, B: MarketBackend> PurchaseOrchestrator<C, B> {
    /// Creates a new orchestrator.
    #[must_use]
    pub fn new(
        chain: C,
        backend: B,
        bus: NotificationBus,
        token_decimals: u32,
        generation_price: TokenAmount,
    ) -> Self {
        Self {
            chain,
            backend,
            bus,
            token_decimals,
            generation_price,
            in_flight: Mutex::new(()),
        }
    }

    /// Returns a reference to the chain gateway.
    #[must_use]
    pub const fn chain(&self) -> &C {
        &self.chain
    }

    /// Returns a reference to the notification bus.
    #[must_use]
    pub const fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Fee charged per generation.
    #[must_use]
    pub const fn generation_price(&self) -> &TokenAmount {
        &self.generation_price
    }

    /// Buys `workflow` for the connected wallet.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Busy`] if another orchestration is running.
    /// - [`MarketError::WalletNotConnected`] before any chain call.
    /// - [`MarketError::Chain`] if the approval, simulation or purchase
    ///   fails; the backend is not called.
    /// - [`MarketError::SettlementFailed`] if the purchase was mined but
    ///   the backend did not record it.
    pub async fn purchase(
        &self,
        session: &WalletSession,
        workflow: &Workflow,
    ) -> Result<OrchestrationReceipt, MarketError> {
        let result = self.run_purchase(session, workflow).await;
        if let Err(err) = &result {
            self.report_failure(err, "Purchase");
        }
        result
    }

    /// Pays the generation fee and asks the backend to generate a workflow
    /// from `prompt`.
    ///
    /// # Errors
    ///
    /// - [`MarketError::EmptyPrompt`] for a blank prompt, before any chain
    ///   call.
    /// - Otherwise the same errors as [`Self::purchase`].
    pub async fn generate(
        &self,
        session: &WalletSession,
        prompt: &str,
    ) -> Result<OrchestrationReceipt, MarketError> {
        let result = self.run_generate(session, prompt).await;
        if let Err(err) = &result {
            self.report_failure(err, "Generation");
        }
        result
    }

    async fn run_purchase(
        &self,
        session: &WalletSession,
        workflow: &Workflow,
    ) -> Result<OrchestrationReceipt, MarketError> {
        let _guard = self.in_flight.try_lock().map_err(|_| MarketError::Busy)?;
        let buyer = session.require_address()?;
        let amount = workflow.price.to_base_units(self.token_decimals)?;

        let approval_tx = self.ensure_allowance(buyer, amount).await?;

        let action = ContractAction::Purchase {
            amount,
            seller: workflow.seller.as_address(),
        };
        let prepared = self.chain.simulate(buyer.as_address(), action).await?;
        self.bus.publish(MarketEvent::PurchaseSubmitted {
            workflow_id: workflow.id.clone(),
            buyer,
            timestamp: Utc::now(),
        });
        let action_tx = self.chain.submit(prepared).await?;
        tracing::info!(workflow_id = %workflow.id, %buyer, tx = %format!("{action_tx:#x}"), "purchase mined");

        let request = PurchaseRequest {
            buyer,
            workflow_id: workflow.id.clone(),
            seller: workflow.seller,
            amount: workflow.price.clone(),
            txn_hash: action_tx,
        };
        self.backend
            .record_purchase(&request)
            .await
            .map_err(|e| settlement_failed(action_tx, &e))?;

        self.bus.publish(MarketEvent::PurchaseRecorded {
            workflow_id: workflow.id.clone(),
            buyer,
            tx_hash: action_tx,
            timestamp: Utc::now(),
        });

        Ok(OrchestrationReceipt {
            approval_tx,
            action_tx,
        })
    }

    async fn run_generate(
        &self,
        session: &WalletSession,
        prompt: &str,
    ) -> Result<OrchestrationReceipt, MarketError> {
        let _guard = self.in_flight.try_lock().map_err(|_| MarketError::Busy)?;
        let prompt = GenerationPrompt::new(prompt)?;
        let requester = session.require_address()?;
        let amount = self.generation_price.to_base_units(self.token_decimals)?;

        let approval_tx = self.ensure_allowance(requester, amount).await?;

        let prepared = self
            .chain
            .simulate(requester.as_address(), ContractAction::Generate { amount })
            .await?;
        self.bus.publish(MarketEvent::GenerationSubmitted {
            requester,
            timestamp: Utc::now(),
        });
        let action_tx = self.chain.submit(prepared).await?;
        tracing::info!(%requester, tx = %format!("{action_tx:#x}"), "generation fee mined");

        let request = GenerateRequest {
            requester,
            req_prompt: prompt.as_str().to_string(),
            txn_hash: action_tx,
        };
        self.backend
            .request_generation(&request)
            .await
            .map_err(|e| settlement_failed(action_tx, &e))?;

        self.bus.publish(MarketEvent::GenerationCompleted {
            requester,
            tx_hash: action_tx,
            timestamp: Utc::now(),
        });

        Ok(OrchestrationReceipt {
            approval_tx,
            action_tx,
        })
    }

    /// Raises the allowance to [`max_approval`] when it is below `required`.
    async fn ensure_allowance(
        &self,
        owner: WalletAddress,
        required: U256,
    ) -> Result<Option<TxHash>, MarketError> {
        let current = self.chain.allowance(owner.as_address()).await?;
        if current >= required {
            tracing::debug!(%owner, %current, %required, "allowance sufficient");
            return Ok(None);
        }

        self.bus.publish(MarketEvent::ApprovalRequested {
            owner,
            required: required.to_string(),
            timestamp: Utc::now(),
        });
        let tx_hash = self.chain.approve(max_approval()).await?;
        self.bus.publish(MarketEvent::ApprovalConfirmed {
            owner,
            tx_hash,
            timestamp: Utc::now(),
        });
        tracing::info!(%owner, tx = %format!("{tx_hash:#x}"), "allowance approved");
        Ok(Some(tx_hash))
    }

    fn report_failure(&self, err: &MarketError, action: &str) {
        tracing::warn!(code = err.error_code(), error = %err, action, "operation failed");
        self.bus.publish(MarketEvent::OperationFailed {
            code: err.error_code(),
            notification: err.notification(action),
            timestamp: Utc::now(),
        });
    }
}

fn settlement_failed(tx_hash: TxHash, err: &MarketError) -> MarketError {
    MarketError::SettlementFailed {
        tx_hash,
        reason: err.to_string(),
    }
}
