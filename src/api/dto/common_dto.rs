//! Shared envelope types used across multiple endpoints.

use serde::{Deserialize, Serialize};

/// List envelope returned by every collection endpoint: `{ "workflows": [...] }`.
///
/// The backend uses the same key for listings, purchase records and
/// generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowsEnvelope<T> {
    /// Returned records. A missing key is treated as an empty list.
    #[serde(default = "Vec::new")]
    pub workflows: Vec<T>,
}

impl<T> WorkflowsEnvelope<T> {
    /// Unwraps the records.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.workflows
    }
}

/// Response body for `GET /workflow/hasPurchasedWorkflow`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasPurchasedResponse {
    /// Whether the buyer owns the workflow.
    #[serde(default)]
    pub has_purchased: bool,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn missing_workflows_key_is_empty() {
        let Ok(env) = serde_json::from_str::<WorkflowsEnvelope<serde_json::Value>>("{}") else {
            panic!("envelope should parse");
        };
        assert!(env.into_inner().is_empty());
    }

    #[test]
    fn has_purchased_reads_camel_case() {
        let Ok(resp) = serde_json::from_str::<HasPurchasedResponse>(r#"{"hasPurchased": true}"#)
        else {
            panic!("response should parse");
        };
        assert!(resp.has_purchased);
    }
}
