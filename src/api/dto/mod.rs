//! Data Transfer Objects for backend request/response serialization.
//!
//! Field names follow the backend's camelCase convention. Token amounts are
//! decimal strings.

pub mod common_dto;
pub mod generation_dto;
pub mod listing_dto;
pub mod purchase_dto;

pub use common_dto::*;
pub use generation_dto::*;
pub use listing_dto::*;
pub use purchase_dto::*;
