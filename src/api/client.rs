//! REST client for the marketplace backend.
//!
//! Wraps every endpoint the UI consumes using [`reqwest`]. All paths are
//! resolved against a single configured base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::MarketBackend;
use super::dto::{
    GenerateRequest, HasPurchasedResponse, PurchaseRequest, WorkflowsEnvelope, listing_form,
};
use crate::domain::{
    GeneratedWorkflow, PurchaseRecord, RevenueStats, ValidListing, WalletAddress, Workflow,
    WorkflowId,
};
use crate::error::MarketError;

/// File name used when a file URL has no usable last path segment.
pub const DEFAULT_FILE_NAME: &str = "workflow.json";

/// HTTP client for the marketplace backend.
#[derive(Debug, Clone)]
pub struct MarketApiClient {
    client: reqwest::Client,
    base_url: Url,
}

/// A fetched workflow file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Name derived from the file URL.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    /// Writes the file into `dir` and returns the full path.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Io`] if the directory cannot be created or the
    /// file cannot be written.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, MarketError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Last non-empty path segment of `file_url`, or [`DEFAULT_FILE_NAME`].
#[must_use]
pub fn file_name_from_url(file_url: &str) -> String {
    Url::parse(file_url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
}

impl MarketApiClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the URL does not parse and
    /// [`MarketError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, MarketError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, base_url)
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the URL does not parse.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, MarketError> {
        // A trailing slash makes `Url::join` append instead of replace.
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| MarketError::Config(format!("invalid api url {base_url:?}: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /workflow/getAll`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>, MarketError> {
        self.get_list("workflow/getAll", &[]).await
    }

    /// `GET /workflow/getTopWorkflows`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn top_workflows(&self) -> Result<Vec<Workflow>, MarketError> {
        self.get_list("workflow/getTopWorkflows", &[]).await
    }

    /// `GET /workflow/getIndividual?id=`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn get_workflow(&self, id: &WorkflowId) -> Result<Workflow, MarketError> {
        let url = self.endpoint("workflow/getIndividual", &[("id", id.as_str())])?;
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// `GET /workflow/hasPurchasedWorkflow?buyer=&workflowId=`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn has_purchased(
        &self,
        buyer: WalletAddress,
        id: &WorkflowId,
    ) -> Result<bool, MarketError> {
        let buyer = buyer.to_string();
        let url = self.endpoint(
            "workflow/hasPurchasedWorkflow",
            &[("buyer", buyer.as_str()), ("workflowId", id.as_str())],
        )?;
        let response = self.client.get(url).send().await?;
        let body: HasPurchasedResponse = Self::parse_response(response).await?;
        Ok(body.has_purchased)
    }

    /// `POST /workflow/create` with a multipart body.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn create_listing(
        &self,
        listing: ValidListing,
        seller: WalletAddress,
    ) -> Result<(), MarketError> {
        let url = self.endpoint("workflow/create", &[])?;
        let form = listing_form(listing, seller)?;
        let response = self.client.post(url).multipart(form).send().await?;
        Self::check_status(response).await
    }

    /// `POST /workflow/edit` with a multipart body.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn edit_listing(
        &self,
        listing: ValidListing,
        seller: WalletAddress,
    ) -> Result<(), MarketError> {
        let url = self.endpoint("workflow/edit", &[])?;
        let form = listing_form(listing, seller)?;
        let response = self.client.post(url).multipart(form).send().await?;
        Self::check_status(response).await
    }

    /// `GET /dashboard/getStats?seller=`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn revenue_stats(&self, seller: WalletAddress) -> Result<RevenueStats, MarketError> {
        let seller = seller.to_string();
        let url = self.endpoint("dashboard/getStats", &[("seller", seller.as_str())])?;
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// `GET /dashboard/getListedWorkflows?seller=`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn listed_workflows(
        &self,
        seller: WalletAddress,
    ) -> Result<Vec<Workflow>, MarketError> {
        let seller = seller.to_string();
        self.get_list("dashboard/getListedWorkflows", &[("seller", seller.as_str())])
            .await
    }

    /// `GET /dashboard/getPurchasedWorkflows?buyer=`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn purchased_workflows(
        &self,
        buyer: WalletAddress,
    ) -> Result<Vec<PurchaseRecord>, MarketError> {
        let buyer = buyer.to_string();
        self.get_list("dashboard/getPurchasedWorkflows", &[("buyer", buyer.as_str())])
            .await
    }

    /// `GET /generatedWorkflow/getPrevious?requester=`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn previous_generations(
        &self,
        requester: WalletAddress,
    ) -> Result<Vec<GeneratedWorkflow>, MarketError> {
        let requester = requester.to_string();
        self.get_list(
            "generatedWorkflow/getPrevious",
            &[("requester", requester.as_str())],
        )
        .await
    }

    /// Fetches raw bytes from an absolute file URL.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError`] on transport failure or non-2xx status.
    pub async fn fetch_file(&self, file_url: &str) -> Result<DownloadedFile, MarketError> {
        let response = self.client.get(file_url).send().await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(DownloadedFile {
            file_name: file_name_from_url(file_url),
            bytes: bytes.to_vec(),
        })
    }

    /// Looks up a workflow and fetches its JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::MissingFile`] if the workflow has no file URL,
    /// or any transport/status error from either request.
    pub async fn download_workflow(&self, id: &WorkflowId) -> Result<DownloadedFile, MarketError> {
        let workflow = self.get_workflow(id).await?;
        let Some(file_url) = workflow.file_url.filter(|url| !url.is_empty()) else {
            return Err(MarketError::MissingFile(id.clone()));
        };
        tracing::debug!(workflow_id = %id, %file_url, "fetching workflow file");
        self.fetch_file(&file_url).await
    }

    // ---- private helpers ----

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, MarketError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| MarketError::Config(format!("invalid endpoint {path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, MarketError> {
        let url = self.endpoint(path, query)?;
        let response = self.client.get(url).send().await?;
        let envelope: WorkflowsEnvelope<serde_json::Value> = Self::parse_response(response).await?;
        Ok(decode_rows(path, envelope.into_inner()))
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`MarketError::Backend`] containing the
    /// status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MarketError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MarketError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, MarketError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), MarketError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Decodes each row on its own so one malformed record does not hide the
/// rest of the list. Rejected rows are logged and skipped.
fn decode_rows<T: DeserializeOwned>(path: &str, rows: Vec<serde_json::Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path, index, error = %e, "skipping malformed row");
                None
            }
        })
        .collect()
}

impl MarketBackend for MarketApiClient {
    async fn record_purchase(&self, request: &PurchaseRequest) -> Result<(), MarketError> {
        let url = self.endpoint("workflow/purchase", &[])?;
        let response = self.client.post(url).json(request).send().await?;
        Self::check_status(response).await
    }

    async fn request_generation(&self, request: &GenerateRequest) -> Result<(), MarketError> {
        let url = self.endpoint("generatedWorkflow/generate", &[])?;
        let response = self.client.post(url).json(request).send().await?;
        Self::check_status(response).await
    }
}
