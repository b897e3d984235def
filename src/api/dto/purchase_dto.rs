//! Purchase settlement DTO.

use ethers::types::TxHash;
use serde::{Deserialize, Serialize};

use crate::domain::{TokenAmount, WalletAddress, WorkflowId};

/// Request body for `POST /workflow/purchase`, sent once the purchase
/// transaction is mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Buyer address.
    pub buyer: WalletAddress,
    /// Purchased workflow.
    pub workflow_id: WorkflowId,
    /// Seller address.
    pub seller: WalletAddress,
    /// Price paid in FLOW.
    pub amount: TokenAmount,
    /// Purchase transaction hash.
    pub txn_hash: TxHash,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_backend_field_names() {
        let Ok(buyer) = "0x00000000000000000000000000000000000000b1".parse::<WalletAddress>() else {
            panic!("valid address");
        };
        let Ok(amount) = TokenAmount::parse("2.5") else {
            panic!("valid amount");
        };
        let req = PurchaseRequest {
            buyer,
            workflow_id: WorkflowId::from("w1"),
            seller: buyer,
            amount,
            txn_hash: TxHash::repeat_byte(0xaa),
        };
        let Ok(json) = serde_json::to_value(&req) else {
            panic!("serialization failed");
        };
        assert_eq!(json["workflowId"], "w1");
        assert_eq!(json["amount"], "2.5");
        assert!(json["txnHash"].as_str().is_some_and(|h| h.starts_with("0xaaaa")));
    }
}
