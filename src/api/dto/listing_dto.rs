//! Multipart body for listing creation and edits.

use reqwest::multipart::{Form, Part};

use crate::domain::{Attachment, ValidListing, WalletAddress};
use crate::error::MarketError;

/// Builds the multipart form for `POST /workflow/create` and
/// `POST /workflow/edit`.
///
/// Text fields: `id` (edits only), `name`, `desc`, `seller`, `price`.
/// File parts: `image` and `workflowJson`, each only when present.
///
/// # Errors
///
/// Returns [`MarketError::Request`] if an attachment's MIME type is not a
/// valid MIME string.
pub fn listing_form(listing: ValidListing, seller: WalletAddress) -> Result<Form, MarketError> {
    let mut form = Form::new();
    if let Some(id) = listing.id {
        form = form.text("id", id.to_string());
    }
    form = form
        .text("name", listing.name)
        .text("desc", listing.description)
        .text("seller", seller.to_string())
        .text("price", listing.price.to_string());
    if let Some(image) = listing.image {
        form = form.part("image", file_part(image)?);
    }
    if let Some(workflow) = listing.workflow_file {
        form = form.part("workflowJson", file_part(workflow)?);
    }
    Ok(form)
}

fn file_part(file: Attachment) -> Result<Part, MarketError> {
    Ok(Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime)?)
}
