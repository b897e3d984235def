//! Backend API layer: HTTP client, wire DTOs, and the settlement seam.

pub mod client;
pub mod dto;

use std::future::Future;

pub use client::{DownloadedFile, MarketApiClient, file_name_from_url};

use crate::error::MarketError;
use dto::{GenerateRequest, PurchaseRequest};

/// Backend writes the purchase orchestrator performs after a transaction
/// is mined.
pub trait MarketBackend {
    /// Records a sale (`POST /workflow/purchase`).
    fn record_purchase(
        &self,
        request: &PurchaseRequest,
    ) -> impl Future<Output = Result<(), MarketError>> + Send;

    /// Asks the backend to generate a workflow
    /// (`POST /generatedWorkflow/generate`).
    fn request_generation(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<(), MarketError>> + Send;
}
