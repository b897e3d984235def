//! Seller listing forms: create and edit.
//!
//! Forms start out as raw user input and must pass [`validator`] checks
//! before they can be turned into a multipart request. Only a
//! [`ValidListing`] reaches the HTTP layer.

use std::path::Path;

use serde::Serialize;
use validator::{Validate, ValidationError};

use super::amount::FLOW_DECIMALS;
use super::{TokenAmount, Workflow, WorkflowId};
use crate::error::MarketError;

/// A file selected for upload.
///
/// Serializes as its name and MIME type only; validation errors carry it
/// as a parameter and must not embed the file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// MIME type sent in the multipart part.
    pub mime: String,
    /// File contents.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Builds an attachment from in-memory contents, guessing the MIME type
    /// from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Reads an attachment from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Io`] if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, MarketError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Whether the MIME type is an image type.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// A price must be a decimal that is at least one base unit of FLOW.
fn validate_price(price: &str) -> Result<(), ValidationError> {
    let units = TokenAmount::parse(price).and_then(|amount| amount.to_base_units(FLOW_DECIMALS));
    match units {
        Ok(units) if !units.is_zero() => Ok(()),
        _ => Err(ValidationError::new("price")
            .with_message("price must be a positive decimal amount".into())),
    }
}

fn validate_workflow_json(file: &Attachment) -> Result<(), ValidationError> {
    serde_json::from_slice::<serde_json::Value>(&file.bytes)
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("workflow_json")
                .with_message("workflow file must contain valid JSON".into())
        })
}

fn validate_image(image: &Attachment) -> Result<(), ValidationError> {
    if image.is_image() {
        Ok(())
    } else {
        Err(ValidationError::new("image").with_message("image must be an image file".into()))
    }
}

/// The "List a New Workflow" form.
#[derive(Debug, Clone, Validate)]
pub struct ListingForm {
    /// Workflow name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Description.
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// Price in FLOW, as typed.
    #[validate(custom(function = "validate_price"))]
    pub price: String,
    /// Optional preview image.
    #[validate(custom(function = "validate_image"))]
    pub image: Option<Attachment>,
    /// The workflow JSON file; required.
    #[validate(custom(function = "validate_workflow_json"))]
    pub workflow_file: Attachment,
}

impl ListingForm {
    /// Validates the form and produces a submission-ready listing.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidForm`] listing every failing field.
    pub fn validated(self) -> Result<ValidListing, MarketError> {
        let form = Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().to_string(),
            ..self
        };
        form.validate()?;
        Ok(ValidListing {
            id: None,
            name: form.name,
            description: form.description,
            price: TokenAmount::parse(&form.price)?,
            image: form.image,
            workflow_file: Some(form.workflow_file),
        })
    }
}

/// The "Edit Workflow" dialog.
///
/// Starts pre-filled from the existing listing; files are only re-uploaded
/// when replaced.
#[derive(Debug, Clone, Validate)]
pub struct ListingEdit {
    /// Listing being edited.
    pub id: WorkflowId,
    /// Workflow name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Description.
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// Price in FLOW, as typed.
    #[validate(custom(function = "validate_price"))]
    pub price: String,
    /// Replacement preview image.
    #[validate(custom(function = "validate_image"))]
    pub image: Option<Attachment>,
    /// Replacement workflow JSON file.
    #[validate(custom(function = "validate_workflow_json"))]
    pub workflow_file: Option<Attachment>,
}

impl ListingEdit {
    /// Pre-fills the dialog from an existing listing.
    #[must_use]
    pub fn from_existing(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            description: workflow.desc.clone(),
            price: workflow.price.to_string(),
            image: None,
            workflow_file: None,
        }
    }

    /// Validates the edit and produces a submission-ready listing.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidForm`] listing every failing field.
    pub fn validated(self) -> Result<ValidListing, MarketError> {
        let edit = Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().to_string(),
            ..self
        };
        edit.validate()?;
        Ok(ValidListing {
            id: Some(edit.id),
            name: edit.name,
            description: edit.description,
            price: TokenAmount::parse(&edit.price)?,
            image: edit.image,
            workflow_file: edit.workflow_file,
        })
    }
}

/// A listing that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidListing {
    /// Set for edits, absent for new listings.
    pub id: Option<WorkflowId>,
    /// Workflow name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Price in FLOW.
    pub price: TokenAmount,
    /// Preview image to upload.
    pub image: Option<Attachment>,
    /// Workflow JSON to upload.
    pub workflow_file: Option<Attachment>,
}
