//! Market service: page loading, listing management, and downloads.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::api::MarketApiClient;
use crate::domain::{
    GeneratedWorkflow, ListingEdit, ListingForm, MarketEvent, NotificationBus, WalletSession,
    WorkflowId,
};
use crate::error::MarketError;
use crate::view::{DashboardView, GeneratorView, MarketplaceView, WorkflowDetail};

/// Loads page data from the backend and runs the non-paying actions.
///
/// Mutating actions (list, edit, download) publish a success event or
/// [`MarketEvent::OperationFailed`] on the bus, like the orchestrator.
#[derive(Debug, Clone)]
pub struct MarketService {
    api: MarketApiClient,
    bus: NotificationBus,
    page_size: usize,
    table_page_size: usize,
}

impl MarketService {
    /// Creates a new `MarketService`.
    #[must_use]
    pub fn new(
        api: MarketApiClient,
        bus: NotificationBus,
        page_size: usize,
        table_page_size: usize,
    ) -> Self {
        Self {
            api,
            bus,
            page_size,
            table_page_size,
        }
    }

    /// Returns a reference to the backend client.
    #[must_use]
    pub const fn api(&self) -> &MarketApiClient {
        &self.api
    }

    /// Returns a reference to the notification bus.
    #[must_use]
    pub const fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Loads the marketplace page. Purchase history is fetched only for a
    /// connected wallet; otherwise every row offers Purchase.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] if any backend request fails.
    pub async fn marketplace(&self, session: &WalletSession) -> Result<MarketplaceView, MarketError> {
        let purchases = async {
            match session.address() {
                Some(buyer) => self.api.purchased_workflows(buyer).await,
                None => Ok(Vec::new()),
            }
        };
        let (all, top, purchases) = tokio::try_join!(
            self.api.list_workflows(),
            self.api.top_workflows(),
            purchases
        )?;
        tracing::debug!(all = all.len(), top = top.len(), "marketplace loaded");
        Ok(MarketplaceView::new(all, top, &purchases, self.page_size))
    }

    /// Loads one workflow and whether the connected wallet owns it.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] if either backend request fails.
    pub async fn detail(
        &self,
        session: &WalletSession,
        id: &WorkflowId,
    ) -> Result<WorkflowDetail, MarketError> {
        let workflow = self.api.get_workflow(id).await?;
        let purchased = match session.address() {
            Some(buyer) => self.api.has_purchased(buyer, id).await?,
            None => false,
        };
        Ok(WorkflowDetail {
            workflow,
            purchased,
        })
    }

    /// Loads the seller dashboard panels.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`] without a wallet, or any
    /// backend error.
    pub async fn dashboard(&self, session: &WalletSession) -> Result<DashboardView, MarketError> {
        let address = session.require_address()?;
        let (stats, listed, purchases) = tokio::try_join!(
            self.api.revenue_stats(address),
            self.api.listed_workflows(address),
            self.api.purchased_workflows(address)
        )?;
        Ok(DashboardView::new(
            *session,
            stats,
            listed,
            purchases,
            self.table_page_size,
        ))
    }

    /// Loads the generator history.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`] without a wallet, or any
    /// backend error.
    pub async fn generator(&self, session: &WalletSession) -> Result<GeneratorView, MarketError> {
        let history = self.generation_history(session).await?;
        Ok(GeneratorView::new(history, self.table_page_size))
    }

    /// Fetches the connected wallet's previous generations.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`] without a wallet, or any
    /// backend error.
    pub async fn generation_history(
        &self,
        session: &WalletSession,
    ) -> Result<Vec<GeneratedWorkflow>, MarketError> {
        let requester = session.require_address()?;
        self.api.previous_generations(requester).await
    }

    /// Validates and uploads a new listing for the connected wallet.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`], [`MarketError::InvalidForm`]
    /// before any request, or any backend error.
    pub async fn create_listing(
        &self,
        session: &WalletSession,
        form: ListingForm,
    ) -> Result<(), MarketError> {
        let result: Result<String, MarketError> = async {
            let seller = session.require_address()?;
            let listing = form.validated()?;
            let name = listing.name.clone();
            self.api.create_listing(listing, seller).await?;
            tracing::info!(%seller, %name, "workflow listed");
            Ok(name)
        }
        .await;
        match result {
            Ok(name) => {
                self.bus.publish(MarketEvent::ListingCreated {
                    name,
                    timestamp: Utc::now(),
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Upload")),
        }
    }

    /// Validates and uploads changes to an existing listing.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_listing`].
    pub async fn edit_listing(
        &self,
        session: &WalletSession,
        edit: ListingEdit,
    ) -> Result<(), MarketError> {
        let workflow_id = edit.id.clone();
        let result: Result<String, MarketError> = async {
            let seller = session.require_address()?;
            let listing = edit.validated()?;
            let name = listing.name.clone();
            self.api.edit_listing(listing, seller).await?;
            tracing::info!(%seller, %workflow_id, "workflow updated");
            Ok(name)
        }
        .await;
        match result {
            Ok(name) => {
                self.bus.publish(MarketEvent::ListingUpdated {
                    workflow_id,
                    name,
                    timestamp: Utc::now(),
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Update")),
        }
    }

    /// Fetches a workflow's file and saves it into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::MissingFile`] if the workflow has no file,
    /// a backend error, or [`MarketError::Io`] if the file cannot be written.
    pub async fn download(&self, id: &WorkflowId, dir: &Path) -> Result<PathBuf, MarketError> {
        let result: Result<PathBuf, MarketError> = async {
            let file = self.api.download_workflow(id).await?;
            self.bus.publish(MarketEvent::DownloadStarted {
                file_name: file.file_name.clone(),
                timestamp: Utc::now(),
            });
            file.save_to(dir).await
        }
        .await;
        result.map_err(|err| self.fail(err, "Download"))
    }

    /// Saves one of the wallet's generated workflows into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`] without a wallet,
    /// [`MarketError::MissingFile`] if no generation with `generation_id`
    /// has a file, a backend error, or [`MarketError::Io`].
    pub async fn download_generated(
        &self,
        session: &WalletSession,
        generation_id: &str,
        dir: &Path,
    ) -> Result<PathBuf, MarketError> {
        let result: Result<PathBuf, MarketError> = async {
            let history = self.generation_history(session).await?;
            let Some(generation) = history
                .into_iter()
                .find(|g| g.id == generation_id && !g.file_url.is_empty())
            else {
                return Err(MarketError::MissingFile(WorkflowId::from(generation_id)));
            };
            let file = self.api.fetch_file(&generation.file_url).await?;
            self.bus.publish(MarketEvent::DownloadStarted {
                file_name: file.file_name.clone(),
                timestamp: Utc::now(),
            });
            file.save_to(dir).await
        }
        .await;
        result.map_err(|err| self.fail(err, "Download"))
    }

    fn fail(&self, err: MarketError, action: &str) -> MarketError {
        tracing::warn!(code = err.error_code(), error = %err, action, "operation failed");
        self.bus.publish(MarketEvent::OperationFailed {
            code: err.error_code(),
            notification: err.notification(action),
            timestamp: Utc::now(),
        });
        err
    }
}
