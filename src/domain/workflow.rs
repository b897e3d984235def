//! Marketplace records exchanged with the backend.
//!
//! These are transient copies of backend-owned data: fetched on demand,
//! rendered, and dropped. Field names follow the backend's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TokenAmount, WalletAddress, WorkflowId};

/// A workflow listed for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: WorkflowId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub desc: String,
    /// Price in FLOW.
    pub price: TokenAmount,
    /// Seller address; receives the payment.
    pub seller: WalletAddress,
    /// Preview image, if the seller uploaded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Location of the workflow JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Whether the listing is live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Listing creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last edit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A recorded sale, as returned by the purchase history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Backend identifier of the sale.
    #[serde(rename = "_id")]
    pub id: String,
    /// Buyer address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<WalletAddress>,
    /// Seller address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<WalletAddress>,
    /// Purchased workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<WorkflowId>,
    /// Workflow name at the time of purchase.
    #[serde(default)]
    pub workflow_name: String,
    /// Amount paid in FLOW.
    pub amount: TokenAmount,
    /// Hash of the purchase transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_hash: Option<String>,
    /// When the sale was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<DateTime<Utc>>,
}

/// A workflow produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkflow {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Who paid for the generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<WalletAddress>,
    /// The prompt the workflow was generated from.
    #[serde(rename = "desc", default)]
    pub prompt: String,
    /// Location of the generated JSON file.
    pub file_url: String,
    /// Generation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Seller revenue totals in FLOW.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    /// All-time revenue.
    #[serde(default)]
    pub lifetime_revenue: f64,
    /// Revenue over the last 7 days.
    #[serde(rename = "revenueWeekAgo", default)]
    pub weekly_revenue: f64,
    /// Revenue over the last 24 hours.
    #[serde(rename = "revenueDayAgo", default)]
    pub daily_revenue: f64,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn workflow_parses_backend_shape() {
        let json = r#"{
            "_id": "w1",
            "name": "Data Workflow",
            "desc": "Cleans CSVs",
            "price": 12.5,
            "seller": "0x7b96af9bd211cbf6ba5b0dd53aa61dc5806b6ace",
            "imageUrl": "https://cdn.example/w1.png",
            "fileUrl": "https://cdn.example/w1.json",
            "isActive": true,
            "createdAt": "2025-01-02T03:04:05.000Z",
            "updatedAt": "2025-01-03T03:04:05.000Z",
            "__v": 0
        }"#;
        let Ok(workflow) = serde_json::from_str::<Workflow>(json) else {
            panic!("workflow should parse");
        };
        assert_eq!(workflow.id.as_str(), "w1");
        assert_eq!(workflow.price.as_str(), "12.5");
        assert_eq!(workflow.file_url.as_deref(), Some("https://cdn.example/w1.json"));
        assert!(workflow.created_at.is_some());
    }

    #[test]
    fn purchase_record_tolerates_missing_optionals() {
        let json = r#"{"_id": "p1", "amount": "3"}"#;
        let Ok(record) = serde_json::from_str::<PurchaseRecord>(json) else {
            panic!("purchase record should parse");
        };
        assert!(record.workflow_id.is_none());
        assert_eq!(record.workflow_name, "");
    }

    #[test]
    fn generated_workflow_maps_desc_to_prompt() {
        let json = r#"{"_id": "g1", "desc": "resize images", "fileUrl": "https://cdn.example/g1.json"}"#;
        let Ok(generated) = serde_json::from_str::<GeneratedWorkflow>(json) else {
            panic!("generated workflow should parse");
        };
        assert_eq!(generated.prompt, "resize images");
    }

    #[test]
    fn revenue_stats_maps_window_names() {
        let json = r#"{"lifetimeRevenue": 100, "revenueWeekAgo": 20.5, "revenueDayAgo": 1}"#;
        let Ok(stats) = serde_json::from_str::<RevenueStats>(json) else {
            panic!("stats should parse");
        };
        assert!((stats.weekly_revenue - 20.5).abs() < f64::EPSILON);
        assert!((stats.daily_revenue - 1.0).abs() < f64::EPSILON);
    }
}
