//! Type-safe workflow identifier.
//!
//! [`WorkflowId`] wraps the backend's opaque string identifier (`_id`) so
//! that workflow identifiers cannot be confused with purchase or generation
//! identifiers, or with wallet addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a listed workflow.
///
/// Assigned by the backend when a listing is created and never interpreted
/// by the client beyond equality. Used as the key for purchase membership
/// checks and as the `id` query parameter of the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Creates a `WorkflowId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkflowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WorkflowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for WorkflowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_id() {
        let id = WorkflowId::from("67a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(format!("{id}"), "67a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let Ok(id) = serde_json::from_str::<WorkflowId>("\"w1\"") else {
            panic!("deserialization failed");
        };
        assert_eq!(id.as_str(), "w1");
    }

    #[test]
    fn hash_works_in_hashset() {
        use std::collections::HashSet;
        let set: HashSet<WorkflowId> = ["w1", "w2"].into_iter().map(WorkflowId::from).collect();
        assert!(set.contains(&WorkflowId::from("w1")));
        assert!(!set.contains(&WorkflowId::from("w3")));
    }
}
