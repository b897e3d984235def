//! Seller dashboard: wallet, revenue, listed workflows, purchase history.

use super::pagination::{Page, Paginator};
use crate::domain::{PurchaseRecord, RevenueStats, WalletSession, Workflow};

/// State of the dashboard page.
///
/// The listed-workflows and purchase-history tables page independently.
#[derive(Debug, Clone)]
pub struct DashboardView {
    session: WalletSession,
    stats: RevenueStats,
    listed: Vec<Workflow>,
    purchases: Vec<PurchaseRecord>,
    listed_page: usize,
    purchases_page: usize,
    paginator: Paginator,
}

impl DashboardView {
    /// Builds the dashboard from fetched panels.
    #[must_use]
    pub fn new(
        session: WalletSession,
        stats: RevenueStats,
        listed: Vec<Workflow>,
        purchases: Vec<PurchaseRecord>,
        page_size: usize,
    ) -> Self {
        Self {
            session,
            stats,
            listed,
            purchases,
            listed_page: 1,
            purchases_page: 1,
            paginator: Paginator::new(page_size),
        }
    }

    /// Wallet panel state.
    #[must_use]
    pub const fn session(&self) -> &WalletSession {
        &self.session
    }

    /// Revenue panel.
    #[must_use]
    pub const fn stats(&self) -> &RevenueStats {
        &self.stats
    }

    /// Jumps the listed-workflows table to `page`.
    pub fn set_listed_page(&mut self, page: usize) {
        self.listed_page = page;
    }

    /// Jumps the purchase-history table to `page`.
    pub fn set_purchases_page(&mut self, page: usize) {
        self.purchases_page = page;
    }

    /// Current page of the seller's listings.
    #[must_use]
    pub fn listed(&self) -> Page<'_, Workflow> {
        self.paginator.page(&self.listed, self.listed_page)
    }

    /// Current page of the buyer's purchases.
    #[must_use]
    pub fn purchases(&self) -> Page<'_, PurchaseRecord> {
        self.paginator.page(&self.purchases, self.purchases_page)
    }
}
