//! Domain events and the notifications they surface as.
//!
//! Every step of an orchestration and every dashboard action emits a
//! [`MarketEvent`] through the [`super::NotificationBus`]. Front ends turn
//! events into transient [`Notification`]s ("toasts").

use chrono::{DateTime, Utc};
use ethers::types::TxHash;
use serde::Serialize;

use super::{WalletAddress, WorkflowId};

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    /// Informational or success message.
    Default,
    /// Failure message.
    Destructive,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// One-sentence detail.
    pub description: String,
    /// Visual weight.
    pub variant: NotificationVariant,
    /// How long the message should stay visible, if not the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Notification {
    /// Creates an informational notification.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
            duration_ms: None,
        }
    }

    /// Creates a failure notification.
    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            duration_ms: Some(5_000),
            ..Self::new(title, description)
        }
    }

    /// Overrides the display duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether this is a failure notification.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Domain event emitted by orchestrations and dashboard actions.
///
/// Token amounts are carried as decimal strings so that 256-bit values
/// survive JSON serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// Allowance was insufficient; an approval is about to be signed.
    ApprovalRequested {
        /// Token owner.
        owner: WalletAddress,
        /// Amount the pending action needs, in base units.
        required: String,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The approval transaction was mined.
    ApprovalConfirmed {
        /// Token owner.
        owner: WalletAddress,
        /// Approval transaction hash.
        tx_hash: TxHash,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The purchase call simulated cleanly and is being signed.
    PurchaseSubmitted {
        /// Workflow being bought.
        workflow_id: WorkflowId,
        /// Buyer.
        buyer: WalletAddress,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The backend recorded the sale.
    PurchaseRecorded {
        /// Workflow bought.
        workflow_id: WorkflowId,
        /// Buyer.
        buyer: WalletAddress,
        /// Purchase transaction hash.
        tx_hash: TxHash,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The generation fee call simulated cleanly and is being signed.
    GenerationSubmitted {
        /// Who pays for the generation.
        requester: WalletAddress,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The backend produced the generated workflow.
    GenerationCompleted {
        /// Who paid for the generation.
        requester: WalletAddress,
        /// Fee transaction hash.
        tx_hash: TxHash,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// A new listing was accepted by the backend.
    ListingCreated {
        /// Listing name.
        name: String,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// An existing listing was updated.
    ListingUpdated {
        /// Listing edited.
        workflow_id: WorkflowId,
        /// New name.
        name: String,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// A workflow file download began.
    DownloadStarted {
        /// Name the file is saved under.
        file_name: String,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// An operation aborted.
    OperationFailed {
        /// Numeric error code.
        code: u32,
        /// Notification shown for the failure.
        notification: Notification,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ApprovalRequested { .. } => "approval_requested",
            Self::ApprovalConfirmed { .. } => "approval_confirmed",
            Self::PurchaseSubmitted { .. } => "purchase_submitted",
            Self::PurchaseRecorded { .. } => "purchase_recorded",
            Self::GenerationSubmitted { .. } => "generation_submitted",
            Self::GenerationCompleted { .. } => "generation_completed",
            Self::ListingCreated { .. } => "listing_created",
            Self::ListingUpdated { .. } => "listing_updated",
            Self::DownloadStarted { .. } => "download_started",
            Self::OperationFailed { .. } => "operation_failed",
        }
    }

    /// Returns the timestamp of the event.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ApprovalRequested { timestamp, .. }
            | Self::ApprovalConfirmed { timestamp, .. }
            | Self::PurchaseSubmitted { timestamp, .. }
            | Self::PurchaseRecorded { timestamp, .. }
            | Self::GenerationSubmitted { timestamp, .. }
            | Self::GenerationCompleted { timestamp, .. }
            | Self::ListingCreated { timestamp, .. }
            | Self::ListingUpdated { timestamp, .. }
            | Self::DownloadStarted { timestamp, .. }
            | Self::OperationFailed { timestamp, .. } => *timestamp,
        }
    }

    /// The notification a front end should show for this event.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::ApprovalRequested { .. } => {
                Notification::new("Approve transaction", "Approve to spend your FLOW..")
                    .with_duration_ms(3_000)
            }
            Self::ApprovalConfirmed { .. } => {
                Notification::new("Approval confirmed", "FLOW spending approved.")
                    .with_duration_ms(3_000)
            }
            Self::PurchaseSubmitted { .. } => {
                Notification::new("Purchasing workflow..", "Confirm purchase in your wallet.")
                    .with_duration_ms(1_500)
            }
            Self::PurchaseRecorded { .. } => Notification::new(
                "Purchase Successful",
                "You have successfully purchased the workflow.",
            ),
            Self::GenerationSubmitted { .. } => {
                Notification::new("Generating workflow..", "Confirm payment in your wallet.")
                    .with_duration_ms(1_500)
            }
            Self::GenerationCompleted { .. } => {
                Notification::new("Success", "Workflow generated successfully")
            }
            Self::ListingCreated { .. } => Notification::new(
                "Workflow Listed",
                "Your workflow has been listed for sale successfully.",
            ),
            Self::ListingUpdated { name, .. } => Notification::new(
                "Workflow Updated",
                format!("Workflow {name} has been updated successfully."),
            ),
            Self::DownloadStarted { file_name, .. } => {
                Notification::new("Download Started", format!("Downloading {file_name}..."))
            }
            Self::OperationFailed { notification, .. } => notification.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn buyer() -> WalletAddress {
        let Ok(addr) = "0x00000000000000000000000000000000000000b1".parse::<WalletAddress>() else {
            panic!("valid address");
        };
        addr
    }

    #[test]
    fn approval_requested_event_type() {
        let event = MarketEvent::ApprovalRequested {
            owner: buyer(),
            required: "1000".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "approval_requested");
        assert_eq!(event.notification().title, "Approve transaction");
    }

    #[test]
    fn purchase_recorded_serializes() {
        let event = MarketEvent::PurchaseRecorded {
            workflow_id: WorkflowId::from("w1"),
            buyer: buyer(),
            tx_hash: TxHash::repeat_byte(0x11),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("purchase_recorded"));
        assert!(json_str.contains("\"w1\""));
        assert!(json_str.contains("0x1111"));
    }

    #[test]
    fn failure_event_carries_its_notification() {
        let note = Notification::destructive("Purchase Failed", "reverted");
        let event = MarketEvent::OperationFailed {
            code: 3002,
            notification: note.clone(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.notification(), note);
        assert_eq!(note.duration_ms, Some(5_000));
    }
}
