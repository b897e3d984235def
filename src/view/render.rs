//! Terminal rendering of the page views.
//!
//! One renderer per view. Styling differences are a [`Theme`] parameter
//! rather than separate renderers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::dashboard::DashboardView;
use super::generator::GeneratorView;
use super::marketplace::{ListingAction, ListingRow, MarketplaceView, WorkflowDetail};
use super::pagination::Page;
use crate::domain::{Notification, WalletSession};

/// Terminal styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// ANSI colors and bold headings.
    #[default]
    Color,
    /// No escape codes; for pipes and logs.
    Plain,
}

impl Theme {
    fn paint(self, code: &str, text: &str) -> String {
        match self {
            Self::Color => format!("\x1b[{code}m{text}\x1b[0m"),
            Self::Plain => text.to_string(),
        }
    }

    /// Section heading.
    #[must_use]
    pub fn heading(self, text: &str) -> String {
        match self {
            Self::Color => self.paint("1", text),
            Self::Plain => format!("== {text} =="),
        }
    }

    /// Highlighted value (prices, actions).
    #[must_use]
    pub fn accent(self, text: &str) -> String {
        self.paint("33", text)
    }

    /// Secondary text.
    #[must_use]
    pub fn muted(self, text: &str) -> String {
        self.paint("2", text)
    }

    /// Error text.
    #[must_use]
    pub fn danger(self, text: &str) -> String {
        self.paint("31", text)
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(Self::Color),
            "plain" | "none" => Ok(Self::Plain),
            other => Err(format!("unknown theme {other:?} (expected color or plain)")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Color => "color",
            Self::Plain => "plain",
        })
    }
}

fn date(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn action_label(action: ListingAction, theme: Theme) -> String {
    match action {
        ListingAction::Download => theme.accent("[Download]"),
        ListingAction::Purchase => theme.accent("[Purchase]"),
    }
}

/// Page controls, e.g. `‹ 1  1 [2] 3  3 ›  (12 items)`. Arrows name the
/// page they lead to and are left out at either end.
fn page_footer<T>(page: &Page<'_, T>, theme: Theme) -> Option<String> {
    page.needs_controls().then(|| {
        let mut controls = Vec::new();
        if page.has_previous() {
            controls.push(format!("‹ {}", page.previous()));
        }
        let numbers: Vec<String> = page
            .numbers()
            .map(|n| {
                if n == page.number {
                    format!("[{n}]")
                } else {
                    n.to_string()
                }
            })
            .collect();
        controls.push(numbers.join(" "));
        if page.has_next() {
            controls.push(format!("{} ›", page.next()));
        }
        theme.muted(&format!("{}  ({} items)", controls.join("  "), page.total_items))
    })
}

fn listing_line(row: &ListingRow<'_>, theme: Theme) -> String {
    format!(
        "{}  {}  {} FLOW  {}",
        theme.muted(row.workflow.id.as_str()),
        row.workflow.name,
        theme.accent(row.workflow.price.as_str()),
        action_label(row.action, theme)
    )
}

/// Title bar with the connected wallet.
#[must_use]
pub fn render_header(session: &WalletSession, theme: Theme) -> String {
    let wallet = session
        .address()
        .map_or_else(|| theme.muted("Wallet not connected"), |a| a.short());
    format!("{}    {wallet}", theme.heading("Flowstate Marketplace"))
}

/// Landing page: carousel, search results, page controls.
#[must_use]
pub fn render_marketplace(view: &MarketplaceView, session: &WalletSession, theme: Theme) -> String {
    let mut lines = vec![render_header(session, theme), String::new()];

    lines.push(render_top(view, theme));
    lines.push(String::new());

    let title = if view.search().is_empty() {
        "All Workflows".to_string()
    } else {
        format!("All Workflows matching {:?}", view.search())
    };
    lines.push(theme.heading(&title));
    let page = view.listing_page();
    if page.rows.is_empty() {
        lines.push(theme.muted("No workflows found."));
    }
    for row in &page.rows {
        lines.push(listing_line(row, theme));
        if !row.workflow.desc.is_empty() {
            lines.push(format!("    {}", theme.muted(&row.workflow.desc)));
        }
    }
    if page.total_pages > 1 {
        lines.push(theme.muted(&format!(
            "Page {} of {} ({} results)",
            page.number, page.total_pages, page.total_items
        )));
    }
    lines.join("\n")
}

/// Top-selling carousel.
#[must_use]
pub fn render_top(view: &MarketplaceView, theme: Theme) -> String {
    let mut lines = vec![theme.heading("Top Selling Workflows")];
    let top = view.top_rows();
    if top.is_empty() {
        lines.push(theme.muted("No top sellers yet."));
    }
    lines.extend(top.iter().map(|row| listing_line(row, theme)));
    lines.join("\n")
}

/// Workflow detail dialog.
#[must_use]
pub fn render_detail(detail: &WorkflowDetail, theme: Theme) -> String {
    let w = &detail.workflow;
    let mut lines = vec![theme.heading(&w.name)];
    if let Some(image) = &w.image_url {
        lines.push(theme.muted(image));
    }
    if !w.desc.is_empty() {
        lines.push(w.desc.clone());
    }
    lines.push(format!("Price:  {} FLOW", theme.accent(w.price.as_str())));
    lines.push(format!("Seller: {}", w.seller));
    let action = match detail.action() {
        ListingAction::Download => "Download Workflow",
        ListingAction::Purchase => "Purchase Workflow",
    };
    lines.push(theme.accent(&format!("[{action}]")));
    lines.join("\n")
}

/// Seller dashboard.
#[must_use]
pub fn render_dashboard(view: &DashboardView, theme: Theme) -> String {
    let mut lines = vec![theme.heading("Connected Wallet")];
    lines.push(
        view.session()
            .address()
            .map_or_else(|| "No wallet connected".to_string(), |a| a.to_string()),
    );
    lines.push(String::new());

    let stats = view.stats();
    lines.push(theme.heading("Revenue Overview"));
    lines.push(format!(
        "Last 7 Days: {} FLOW   Lifetime: {} FLOW   Last 24 Hours: {} FLOW",
        theme.accent(&stats.weekly_revenue.to_string()),
        theme.accent(&stats.lifetime_revenue.to_string()),
        theme.accent(&stats.daily_revenue.to_string()),
    ));
    lines.push(String::new());

    lines.push(theme.heading("Your Listed Workflows"));
    let listed = view.listed();
    if listed.items.is_empty() {
        lines.push(theme.muted("Nothing listed yet."));
    }
    for w in listed.items {
        lines.push(format!(
            "{}  {}  {} FLOW  updated {}",
            theme.muted(w.id.as_str()),
            w.name,
            theme.accent(w.price.as_str()),
            date(w.updated_at)
        ));
    }
    lines.extend(page_footer(&listed, theme));
    lines.push(String::new());

    lines.push(theme.heading("Purchase History"));
    let purchases = view.purchases();
    if purchases.items.is_empty() {
        lines.push(theme.muted("No purchases yet."));
    }
    for p in purchases.items {
        let id = p
            .workflow_id
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        lines.push(format!(
            "{}  {}  {}  purchased {}",
            theme.muted(&id),
            p.workflow_name,
            theme.accent(p.amount.as_str()),
            date(p.purchased_at)
        ));
    }
    lines.extend(page_footer(&purchases, theme));
    lines.join("\n")
}

/// Generator history table.
#[must_use]
pub fn render_generator(view: &GeneratorView, theme: Theme) -> String {
    let mut lines = vec![theme.heading("Generation History")];
    let page = view.page();
    if page.items.is_empty() {
        lines.push(theme.muted("No generations yet."));
    }
    for g in page.items {
        lines.push(format!(
            "{}  {}  {}",
            date(g.generated_at),
            g.prompt,
            theme.muted(&g.file_url)
        ));
    }
    lines.extend(page_footer(&page, theme));
    lines.join("\n")
}

/// A toast, as a single terminal line.
#[must_use]
pub fn render_notification(note: &Notification, theme: Theme) -> String {
    // Short-lived progress toasts are dimmed; outcomes stand out.
    let title = if note.is_destructive() {
        theme.danger(&note.title)
    } else if note.duration_ms.is_some() {
        theme.muted(&note.title)
    } else {
        theme.accent(&note.title)
    };
    format!("{title}: {}", note.description)
}
