//! Marketplace listing page: search, pagination, carousel, and detail.

use std::collections::HashSet;

use serde::Serialize;

use super::pagination::{Page, Paginator};
use super::search::filter_by_name;
use crate::domain::{PurchaseRecord, Workflow, WorkflowId};

/// What a listing row offers the connected buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingAction {
    /// The buyer owns the workflow and may download it.
    Download,
    /// The buyer does not own the workflow yet.
    Purchase,
}

/// Download if `id` is among the buyer's purchases, Purchase otherwise.
#[must_use]
pub fn action_for(id: &WorkflowId, purchased: &HashSet<WorkflowId>) -> ListingAction {
    if purchased.contains(id) {
        ListingAction::Download
    } else {
        ListingAction::Purchase
    }
}

/// Collects the workflow ids from a buyer's purchase history.
#[must_use]
pub fn purchased_ids(records: &[PurchaseRecord]) -> HashSet<WorkflowId> {
    records
        .iter()
        .filter_map(|r| r.workflow_id.clone())
        .collect()
}

/// A workflow with the action it should offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingRow<'a> {
    /// The listed workflow.
    pub workflow: &'a Workflow,
    /// Download or Purchase.
    pub action: ListingAction,
}

/// One rendered page of the "All Workflows" list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage<'a> {
    /// Rows on this page.
    pub rows: Vec<ListingRow<'a>>,
    /// This page's number (1-indexed).
    pub number: usize,
    /// Total number of pages of search results.
    pub total_pages: usize,
    /// Total number of search results.
    pub total_items: usize,
}

/// State of the marketplace landing page.
#[derive(Debug, Clone)]
pub struct MarketplaceView {
    all: Vec<Workflow>,
    top: Vec<Workflow>,
    purchased: HashSet<WorkflowId>,
    search: String,
    page: usize,
    paginator: Paginator,
}

impl MarketplaceView {
    /// Builds the page from fetched data.
    #[must_use]
    pub fn new(
        all: Vec<Workflow>,
        top: Vec<Workflow>,
        purchases: &[PurchaseRecord],
        page_size: usize,
    ) -> Self {
        Self {
            all,
            top,
            purchased: purchased_ids(purchases),
            search: String::new(),
            page: 1,
            paginator: Paginator::new(page_size),
        }
    }

    /// Updates the search box. Results restart at page 1.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Jumps to a page; out-of-range numbers are clamped when rendered.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Ids the connected buyer already owns.
    #[must_use]
    pub fn purchased(&self) -> &HashSet<WorkflowId> {
        &self.purchased
    }

    /// Looks up a workflow in either list.
    #[must_use]
    pub fn find(&self, id: &WorkflowId) -> Option<&Workflow> {
        self.all
            .iter()
            .chain(self.top.iter())
            .find(|w| &w.id == id)
    }

    /// Search results, before pagination.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Workflow> {
        filter_by_name(&self.all, &self.search)
    }

    /// The current page of search results.
    #[must_use]
    pub fn listing_page(&self) -> ListingPage<'_> {
        let filtered = self.filtered();
        let page: Page<'_, &Workflow> = self.paginator.page(&filtered, self.page);
        ListingPage {
            rows: page.items.iter().map(|w| self.row(*w)).collect(),
            number: page.number,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }

    /// Rows for the top-selling carousel.
    #[must_use]
    pub fn top_rows(&self) -> Vec<ListingRow<'_>> {
        self.top.iter().map(|w| self.row(w)).collect()
    }

    fn row<'a>(&self, workflow: &'a Workflow) -> ListingRow<'a> {
        ListingRow {
            workflow,
            action: action_for(&workflow.id, &self.purchased),
        }
    }
}

/// The workflow detail dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDetail {
    /// The workflow shown.
    pub workflow: Workflow,
    /// Whether the connected buyer owns it.
    pub purchased: bool,
}

impl WorkflowDetail {
    /// Download if owned, Purchase otherwise.
    #[must_use]
    pub const fn action(&self) -> ListingAction {
        if self.purchased {
            ListingAction::Download
        } else {
            ListingAction::Purchase
        }
    }
}
