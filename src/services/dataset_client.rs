use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info, warn};

use super::join_segments;
use crate::error::{ClientError, ClientResult};
use crate::models::{Dataset, DatasetPage, Envelope, NewDataset, ScanResult, UploadedDocument};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Ingestion and dataset-catalog operations.
///
/// `scan_files` talks to the chat service and gets a bare body back. The
/// catalog calls carry a bearer token and go to their own base URL. Listing and
/// creating datasets unwrap a `{code, message, data}` envelope; uploads do not.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatasetApi: Send + Sync {
    /// Runs one server-side sweep and waits for it to finish.
    async fn scan_files(&self) -> ClientResult<ScanResult>;

    /// 1-indexed; `None` means page 1 and 10 items.
    async fn list_datasets(&self, page: Option<u32>, limit: Option<u32>)
        -> ClientResult<DatasetPage>;

    /// Fails with [`ClientError::Validation`] before any request when the
    /// name is blank.
    async fn create_dataset(&self, dataset: NewDataset) -> ClientResult<Dataset>;

    async fn upload_document(&self, path: &Path) -> ClientResult<UploadedDocument>;
}

#[derive(Clone)]
pub struct HttpDatasetClient {
    client: Client,
    scan_base_url: Url,
    catalog_base_url: Url,
    api_key: Option<String>,
}

impl HttpDatasetClient {
    pub fn new(scan_base_url: Url, catalog_base_url: Url, api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), scan_base_url, catalog_base_url, api_key)
    }

    pub fn with_client(
        client: Client,
        scan_base_url: Url,
        catalog_base_url: Url,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            scan_base_url,
            catalog_base_url,
            api_key,
        }
    }

    fn catalog(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn dispatch(&self, request: RequestBuilder, failure: &'static str) -> ClientResult<Response> {
        let request = request.build().map_err(|e| {
            warn!("{}: could not build request: {}", failure, e);
            ClientError::transport(failure, None)
        })?;
        debug!(method = %request.method(), url = %request.url(), "dataset request");

        let response = self.client.execute(request).await.map_err(|e| {
            warn!("{}: {}", failure, e);
            ClientError::transport(failure, None)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "{}", failure);
            return Err(ClientError::transport(
                format!("{} (HTTP {})", failure, status.as_u16()),
                Some(status),
            ));
        }
        Ok(response)
    }

    async fn fetch_bare<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: &'static str,
    ) -> ClientResult<T> {
        let response = self.dispatch(request, failure).await?;
        let status = response.status();
        response.json().await.map_err(|e| {
            warn!("{}: undecodable body: {}", failure, e);
            ClientError::transport(failure, Some(status))
        })
    }

    async fn fetch_enveloped<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: &'static str,
    ) -> ClientResult<T> {
        let response = self.dispatch(self.catalog(request), failure).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!("{}: body could not be read: {}", failure, e);
            ClientError::transport(failure, Some(status))
        })?;

        let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|e| {
            warn!("{}: malformed envelope: {}", failure, e);
            ClientError::Envelope(format!("{}: {}", failure, e))
        })?;
        debug!(code = %envelope.code, detail = %envelope.message, "catalog response");
        Ok(envelope.data)
    }
}

#[async_trait]
impl DatasetApi for HttpDatasetClient {
    async fn scan_files(&self) -> ClientResult<ScanResult> {
        const FAILURE: &str = "failed to scan files";

        let request = self.client.post(join_segments(&self.scan_base_url, &["scan"]));
        let result: ScanResult = self.fetch_bare(request, FAILURE).await?;

        info!(
            "Scan finished with status {}: {} files processed",
            result.status, result.files_processed
        );
        Ok(result)
    }

    async fn list_datasets(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ClientResult<DatasetPage> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        let request = self
            .client
            .get(join_segments(&self.catalog_base_url, &["datasets"]))
            .query(&[("page", page), ("limit", limit)]);
        self.fetch_enveloped(request, "failed to list datasets").await
    }

    async fn create_dataset(&self, dataset: NewDataset) -> ClientResult<Dataset> {
        let dataset = dataset.validated()?;

        let request = self
            .client
            .post(join_segments(&self.catalog_base_url, &["datasets"]))
            .json(&dataset);
        let created: Dataset = self
            .fetch_enveloped(request, "failed to create dataset")
            .await?;

        info!("Created dataset {} ({})", created.name, created.id);
        Ok(created)
    }

    async fn upload_document(&self, path: &Path) -> ClientResult<UploadedDocument> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::Validation(format!("{} does not name a file", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Validation(format!("cannot read {}: {}", path.display(), e))
        })?;

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| {
                warn!("failed to upload document: {}", e);
                ClientError::transport("failed to upload document", None)
            })?;
        let form = Form::new().part("file", part);

        // The upload endpoint answers with a bare document, not the catalog envelope.
        let request = self.catalog(
            self.client
                .post(join_segments(&self.catalog_base_url, &["datasets", "upload"]))
                .multipart(form),
        );
        let uploaded: UploadedDocument = self
            .fetch_bare(request, "failed to upload document")
            .await?;

        info!("Uploaded {} as document {}", file_name, uploaded.id);
        Ok(uploaded)
    }
}
