//! Page view models and their terminal rendering.
//!
//! Each page (marketplace, dashboard, generator) is a plain struct built
//! from fetched data. Views never call the backend; the service layer
//! loads data and hands it over.

pub mod dashboard;
pub mod generator;
pub mod marketplace;
pub mod pagination;
pub mod render;
pub mod search;

pub use dashboard::DashboardView;
pub use generator::GeneratorView;
pub use marketplace::{
    ListingAction, ListingPage, ListingRow, MarketplaceView, WorkflowDetail, action_for,
    purchased_ids,
};
pub use pagination::{Page, Paginator};
pub use render::Theme;
pub use search::filter_by_name;
