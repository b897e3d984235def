//! Service layer: business logic orchestration.
//!
//! [`PurchaseOrchestrator`] drives the paid flows (purchase and generation)
//! across the chain gateway and the backend. [`MarketService`] loads page
//! data and runs listing uploads and downloads. Both report progress
//! through the [`crate::domain::NotificationBus`].

pub mod market_service;
pub mod purchase_orchestrator;

pub use market_service::MarketService;
pub use purchase_orchestrator::{OrchestrationReceipt, PurchaseOrchestrator};
