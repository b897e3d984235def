//! Generation request DTO.

use ethers::types::TxHash;
use serde::{Deserialize, Serialize};

use crate::domain::WalletAddress;

/// Request body for `POST /generatedWorkflow/generate`, sent once the
/// generation fee transaction is mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Who paid for the generation.
    pub requester: WalletAddress,
    /// Prompt text as typed.
    pub req_prompt: String,
    /// Fee transaction hash, so the backend can tie the generation to a
    /// payment.
    pub txn_hash: TxHash,
}
