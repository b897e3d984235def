//! Client error types with user-facing notification mapping.
//!
//! [`MarketError`] is the central error type for the client. Each variant
//! belongs to one [`ErrorCategory`], carries a stable numeric code, and maps
//! to the [`Notification`] shown to the user when an operation aborts.

use ethers::types::TxHash;
use serde::Serialize;

use crate::chain::ChainError;
use crate::domain::{Notification, WorkflowId};

/// Broad failure category, used to pick the notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Fetch rejected or backend returned a non-success status.
    Network,
    /// Wallet missing, signature rejected, simulation reverted.
    Wallet,
    /// Client-side form or input validation failed.
    Validation,
    /// Local I/O, configuration, or concurrency guard.
    Internal,
}

/// Client-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category   |
/// |-----------|------------|
/// | 1000–1999 | Validation |
/// | 2000–2999 | Network    |
/// | 3000–3999 | Wallet     |
/// | 9000–9999 | Internal   |
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("backend error ({status}): {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The workflow has no downloadable file attached.
    #[error("workflow {0} has no file to download")]
    MissingFile(WorkflowId),

    /// No wallet address is available in the session.
    #[error("wallet not connected")]
    WalletNotConnected,

    /// A chain read, approval, simulation or submission failed.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// The on-chain transaction succeeded but the backend did not record it.
    #[error("transaction {tx_hash:#x} succeeded but settlement failed: {reason}")]
    SettlementFailed {
        /// Hash of the mined purchase/generation transaction.
        tx_hash: TxHash,
        /// Why the backend call failed.
        reason: String,
    },

    /// Form input failed validation.
    #[error("invalid form: {0}")]
    InvalidForm(#[from] validator::ValidationErrors),

    /// A token amount could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The generation prompt is empty.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Another orchestration is still in progress.
    #[error("another operation is already in progress")]
    Busy,

    /// Reading an upload or writing a download failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MarketError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Request(_) | Self::Backend { .. } | Self::MissingFile(_) => {
                ErrorCategory::Network
            }
            Self::WalletNotConnected | Self::Chain(_) | Self::SettlementFailed { .. } => {
                ErrorCategory::Wallet
            }
            Self::InvalidForm(_) | Self::InvalidAmount(_) | Self::EmptyPrompt => {
                ErrorCategory::Validation
            }
            Self::Busy | Self::Io(_) | Self::Config(_) => ErrorCategory::Internal,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidForm(_) => 1001,
            Self::InvalidAmount(_) => 1002,
            Self::EmptyPrompt => 1003,
            Self::Request(_) => 2001,
            Self::Backend { .. } => 2002,
            Self::MissingFile(_) => 2003,
            Self::WalletNotConnected => 3001,
            Self::Chain(_) => 3002,
            Self::SettlementFailed { .. } => 3003,
            Self::Busy => 9001,
            Self::Io(_) => 9002,
            Self::Config(_) => 9003,
        }
    }

    /// Builds the notification shown when an operation aborts with this error.
    ///
    /// `action` names the user-facing operation, e.g. `"Purchase"` or
    /// `"Upload"`, and becomes the `"<action> Failed"` title.
    #[must_use]
    pub fn notification(&self, action: &str) -> Notification {
        match self {
            Self::WalletNotConnected => Notification::new(
                "Connect Wallet",
                "Please connect your wallet to continue.",
            ),
            Self::EmptyPrompt => {
                Notification::destructive("Error", "Please enter a prompt first")
            }
            Self::Busy => Notification::new(
                "Please wait",
                "Another operation is still in progress.",
            ),
            Self::SettlementFailed { tx_hash, .. } => Notification::destructive(
                format!("{action} Failed"),
                format!(
                    "Transaction {tx_hash:#x} went through but could not be recorded. \
                     Keep the hash and contact support."
                ),
            ),
            Self::Chain(ChainError::Rejected(_)) => Notification::destructive(
                format!("{action} Failed"),
                "The transaction was rejected. Do you have the correct wallet connected?",
            ),
            other => Notification::destructive(format!("{action} Failed"), other.to_string()),
        }
    }
}
