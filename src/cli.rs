//! Command line interface: one subcommand per page or action.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use crate::app_state::AppState;
use crate::domain::{
    Attachment, ListingEdit, ListingForm, MarketEvent, NotificationBus, WorkflowId,
};
use crate::view::Theme;
use crate::view::render::{
    render_dashboard, render_detail, render_generator, render_header, render_marketplace,
    render_notification, render_top,
};

/// Flowstate workflow marketplace client.
#[derive(Parser, Debug, Clone)]
#[command(name = "flowstate", version, about)]
pub struct Cli {
    /// Output theme (color or plain); overrides MARKET_THEME
    #[arg(long, global = true, value_name = "THEME")]
    pub theme: Option<Theme>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Marketplace subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all workflows, optionally filtered by name
    Browse {
        /// Case-insensitive name filter
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,

        /// Page of results to show
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show the top-selling workflows
    Top,

    /// Show one workflow
    Show {
        /// Workflow id
        id: String,
    },

    /// Buy a workflow with FLOW
    Buy {
        /// Workflow id
        id: String,
    },

    /// Download a workflow's JSON file
    Download {
        /// Workflow id
        id: String,

        /// Directory to save into
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },

    /// Show revenue, listings and purchase history for the connected wallet
    Dashboard {
        /// Page of the listed-workflows table
        #[arg(long, default_value_t = 1)]
        listed_page: usize,

        /// Page of the purchase-history table
        #[arg(long, default_value_t = 1)]
        purchases_page: usize,
    },

    /// List a new workflow for sale
    ListWorkflow {
        /// Workflow name
        #[arg(long)]
        name: String,

        /// Workflow description
        #[arg(long)]
        description: String,

        /// Price in FLOW
        #[arg(long)]
        price: String,

        /// Workflow JSON file
        #[arg(long, value_name = "FILE")]
        workflow_file: PathBuf,

        /// Optional cover image
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Edit one of your listings; omitted fields keep their current value
    Edit {
        /// Workflow id
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New price in FLOW
        #[arg(long)]
        price: Option<String>,

        /// Replacement workflow JSON file
        #[arg(long, value_name = "FILE")]
        workflow_file: Option<PathBuf>,

        /// Replacement cover image
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Pay the generation fee and generate a workflow from a prompt
    Generate {
        /// What the workflow should do
        prompt: String,
    },

    /// Show previously generated workflows, or download one of them
    Generations {
        /// Page of history to show
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Generation id to download instead of listing
        #[arg(long, value_name = "ID")]
        download: Option<String>,

        /// Directory to save a downloaded generation into
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },
}

/// Prints bus notifications while a command runs.
#[derive(Debug)]
pub struct NotificationPrinter {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl NotificationPrinter {
    /// Subscribes to `bus` and prints each event's notification to stderr.
    #[must_use]
    pub fn spawn(bus: &NotificationBus, theme: Theme) -> Self {
        let mut rx = bus.subscribe();
        let (shutdown, mut stop) = oneshot::channel();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Ok(event) => print_event(&event, theme),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "notifications dropped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = &mut stop => {
                        while let Ok(event) = rx.try_recv() {
                            print_event(&event, theme);
                        }
                        break;
                    }
                }
            }
        });
        Self { shutdown, handle }
    }

    /// Prints whatever is still queued and stops.
    pub async fn finish(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "notification printer stopped abnormally");
        }
    }
}

fn print_event(event: &MarketEvent, theme: Theme) {
    eprintln!("{}", render_notification(&event.notification(), theme));
}

/// Runs one command against `state`.
///
/// # Errors
///
/// Returns an error if the command fails; the matching failure notification
/// has already been published on the bus.
pub async fn execute(state: &AppState, command: Command, theme: Theme) -> anyhow::Result<()> {
    let session = state.session;
    match command {
        Command::Browse { search, page } => {
            let mut view = state.market.marketplace(&session).await?;
            if let Some(query) = search {
                view.set_search(query);
            }
            view.set_page(page);
            println!("{}", render_marketplace(&view, &session, theme));
        }
        Command::Top => {
            let view = state.market.marketplace(&session).await?;
            println!("{}", render_header(&session, theme));
            println!("{}", render_top(&view, theme));
        }
        Command::Show { id } => {
            let detail = state.market.detail(&session, &WorkflowId::from(id)).await?;
            println!("{}", render_detail(&detail, theme));
        }
        Command::Buy { id } => {
            let orchestrator = state.orchestrator()?;
            let detail = state.market.detail(&session, &WorkflowId::from(id)).await?;
            if detail.purchased {
                println!("You already own {}; use `download` to fetch it.", detail.workflow.name);
                return Ok(());
            }
            let receipt = orchestrator.purchase(&session, &detail.workflow).await?;
            println!("purchase tx: {:#x}", receipt.action_tx);
        }
        Command::Download { id, out } => {
            let path = state.market.download(&WorkflowId::from(id), &out).await?;
            println!("saved {}", path.display());
        }
        Command::Dashboard {
            listed_page,
            purchases_page,
        } => {
            let mut view = state.market.dashboard(&session).await?;
            view.set_listed_page(listed_page);
            view.set_purchases_page(purchases_page);
            println!("{}", render_dashboard(&view, theme));
        }
        Command::ListWorkflow {
            name,
            description,
            price,
            workflow_file,
            image,
        } => {
            let form = ListingForm {
                name,
                description,
                price,
                image: load_optional(image.as_deref()).await?,
                workflow_file: load(&workflow_file).await?,
            };
            state.market.create_listing(&session, form).await?;
        }
        Command::Edit {
            id,
            name,
            description,
            price,
            workflow_file,
            image,
        } => {
            let existing = state.market.api().get_workflow(&WorkflowId::from(id)).await?;
            let mut edit = ListingEdit::from_existing(&existing);
            if let Some(name) = name {
                edit.name = name;
            }
            if let Some(description) = description {
                edit.description = description;
            }
            if let Some(price) = price {
                edit.price = price;
            }
            edit.image = load_optional(image.as_deref()).await?;
            edit.workflow_file = load_optional(workflow_file.as_deref()).await?;
            state.market.edit_listing(&session, edit).await?;
        }
        Command::Generate { prompt } => {
            let orchestrator = state.orchestrator()?;
            println!(
                "Generation costs {} FLOW.",
                orchestrator.generation_price().as_str()
            );
            orchestrator.generate(&session, &prompt).await?;
            let view = state.market.generator(&session).await?;
            println!("{}", render_generator(&view, theme));
        }
        Command::Generations {
            download: Some(id),
            out,
            ..
        } => {
            let path = state.market.download_generated(&session, &id, &out).await?;
            println!("saved {}", path.display());
        }
        Command::Generations { page, .. } => {
            let mut view = state.market.generator(&session).await?;
            view.set_page(page);
            println!("{}", render_generator(&view, theme));
        }
    }
    Ok(())
}

async fn load(path: &Path) -> anyhow::Result<Attachment> {
    Attachment::from_path(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn load_optional(path: Option<&Path>) -> anyhow::Result<Option<Attachment>> {
    match path {
        Some(path) => Ok(Some(load(path).await?)),
        None => Ok(None),
    }
}
