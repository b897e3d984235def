//! Domain layer: marketplace records, wallet session, forms, and events.
//!
//! Everything here is client-side state: transient copies of backend data,
//! validated user input, and the events that drive notifications.

pub mod amount;
pub mod listing_form;
pub mod market_event;
pub mod notification_bus;
pub mod prompt;
pub mod wallet;
pub mod workflow;
pub mod workflow_id;

pub use amount::TokenAmount;
pub use listing_form::{Attachment, ListingEdit, ListingForm, ValidListing};
pub use market_event::{MarketEvent, Notification, NotificationVariant};
pub use notification_bus::NotificationBus;
pub use prompt::GenerationPrompt;
pub use wallet::{WalletAddress, WalletSession};
pub use workflow::{GeneratedWorkflow, PurchaseRecord, RevenueStats, Workflow};
pub use workflow_id::WorkflowId;
