//! Opt-in retry around a chat or dataset client.
//!
//! Only transient transport failures (no response, 408, 429, 5xx) of
//! idempotent operations are retried. Creating a chat or dataset, sending a
//! message, scanning and uploading always go through exactly once.

use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use super::chat_client::ChatApi;
use super::dataset_client::DatasetApi;
use crate::error::ClientResult;
use crate::models::{
    ChatId, ChatMetadata, ChatStats, Dataset, DatasetPage, Message, NewDataset, ScanResult,
    UploadedDocument,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. 1 disables retrying.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Backoff before retry number `retry` (1-based): base * 2^(retry - 1).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }

    /// Runs `call` until it succeeds, fails permanently, or attempts run out.
    /// The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{} attempt {} failed, retrying in {:?}: {}",
                        operation, attempt, delay, e
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        error!("{} gave up after {} attempts: {}", operation, attempt, e);
                    } else {
                        debug!("{} failed: {}", operation, e);
                    }
                    return Err(e);
                }
            }
        }
    }
}

/// Decorator applying a [`RetryPolicy`] to every idempotent call of `C`.
#[derive(Clone)]
pub struct Retrying<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C> Retrying<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: ChatApi> ChatApi for Retrying<C> {
    async fn list_chats(&self) -> ClientResult<Vec<ChatMetadata>> {
        self.policy
            .run("list_chats", || self.inner.list_chats())
            .await
    }

    async fn create_chat(&self, id: &ChatId, title: Option<String>) -> ClientResult<ChatMetadata> {
        self.inner.create_chat(id, title).await
    }

    async fn get_chat(&self, id: &ChatId) -> ClientResult<ChatMetadata> {
        self.policy.run("get_chat", || self.inner.get_chat(id)).await
    }

    async fn get_messages(&self, id: &ChatId, limit: Option<u32>) -> ClientResult<Vec<Message>> {
        self.policy
            .run("get_messages", || self.inner.get_messages(id, limit))
            .await
    }

    async fn send_message(&self, id: &ChatId, content: &str) -> ClientResult<Message> {
        self.inner.send_message(id, content).await
    }

    async fn update_chat_title(&self, id: &ChatId, title: &str) -> ClientResult<()> {
        self.policy
            .run("update_chat_title", || self.inner.update_chat_title(id, title))
            .await
    }

    async fn delete_chat(&self, id: &ChatId) -> ClientResult<()> {
        self.policy
            .run("delete_chat", || self.inner.delete_chat(id))
            .await
    }

    async fn get_stats(&self) -> ClientResult<ChatStats> {
        self.policy.run("get_stats", || self.inner.get_stats()).await
    }

    async fn clear_all(&self) -> ClientResult<()> {
        self.policy.run("clear_all", || self.inner.clear_all()).await
    }
}

#[async_trait]
impl<C: DatasetApi> DatasetApi for Retrying<C> {
    async fn scan_files(&self) -> ClientResult<ScanResult> {
        self.inner.scan_files().await
    }

    async fn list_datasets(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ClientResult<DatasetPage> {
        self.policy
            .run("list_datasets", || self.inner.list_datasets(page, limit))
            .await
    }

    async fn create_dataset(&self, dataset: NewDataset) -> ClientResult<Dataset> {
        self.inner.create_dataset(dataset).await
    }

    async fn upload_document(&self, path: &Path) -> ClientResult<UploadedDocument> {
        self.inner.upload_document(path).await
    }
}
