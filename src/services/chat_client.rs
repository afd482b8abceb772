use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::join_segments;
use crate::error::{ClientError, ClientResult};
use crate::models::chat::{CreateChatRequest, SendMessageRequest, UpdateTitleRequest};
use crate::models::{ChatId, ChatMetadata, ChatStats, Message};

pub const DEFAULT_CHAT_TITLE: &str = "new conversation";

/// Operations against the chat service.
///
/// Bodies are bare JSON. Every failure is a [`ClientError::Transport`] with a
/// fixed message per operation; the status code is kept when there is one.
/// Nothing here retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_chats(&self) -> ClientResult<Vec<ChatMetadata>>;

    /// Creates a chat under a caller-chosen id. `None` uses the default title.
    /// The backend rejects an id that already exists (HTTP 400).
    async fn create_chat(&self, id: &ChatId, title: Option<String>) -> ClientResult<ChatMetadata>;

    async fn get_chat(&self, id: &ChatId) -> ClientResult<ChatMetadata>;

    /// Full history, or the most recent `limit` messages in chronological order.
    async fn get_messages(&self, id: &ChatId, limit: Option<u32>) -> ClientResult<Vec<Message>>;

    /// Appends a user turn. Not idempotent: two calls store two messages.
    async fn send_message(&self, id: &ChatId, content: &str) -> ClientResult<Message>;

    async fn update_chat_title(&self, id: &ChatId, title: &str) -> ClientResult<()>;

    /// Irreversible; the chat's messages go with it.
    async fn delete_chat(&self, id: &ChatId) -> ClientResult<()>;

    async fn get_stats(&self) -> ClientResult<ChatStats>;

    /// Administrative wipe of every chat on the backend.
    async fn clear_all(&self) -> ClientResult<()>;
}

#[derive(Clone)]
pub struct HttpChatClient {
    client: Client,
    base_url: Url,
    default_title: String,
}

impl HttpChatClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            default_title: DEFAULT_CHAT_TITLE.to_string(),
        }
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        join_segments(&self.base_url, segments)
    }

    async fn dispatch(&self, request: RequestBuilder, failure: &'static str) -> ClientResult<Response> {
        let request = request.build().map_err(|e| {
            warn!("{}: could not build request: {}", failure, e);
            ClientError::transport(failure, None)
        })?;
        debug!(method = %request.method(), url = %request.url(), "chat request");

        let response = self.client.execute(request).await.map_err(|e| {
            warn!("{}: {}", failure, e);
            ClientError::transport(failure, None)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "{}", failure);
            return Err(ClientError::transport(failure, Some(status)));
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: &'static str,
    ) -> ClientResult<T> {
        let response = self.dispatch(request, failure).await?;
        let status = response.status();
        response.json::<T>().await.map_err(|e| {
            warn!("{}: undecodable body: {}", failure, e);
            ClientError::transport(failure, Some(status))
        })
    }
}

#[async_trait]
impl ChatApi for HttpChatClient {
    async fn list_chats(&self) -> ClientResult<Vec<ChatMetadata>> {
        let request = self.client.get(self.endpoint(&["chats"]));
        self.fetch(request, "failed to list chats").await
    }

    async fn create_chat(&self, id: &ChatId, title: Option<String>) -> ClientResult<ChatMetadata> {
        let body = CreateChatRequest {
            title: title.unwrap_or_else(|| self.default_title.clone()),
        };
        let request = self
            .client
            .post(self.endpoint(&["chats"]))
            .query(&[("chat_id", id.as_str())])
            .json(&body);
        self.fetch(request, "failed to create chat").await
    }

    async fn get_chat(&self, id: &ChatId) -> ClientResult<ChatMetadata> {
        let request = self.client.get(self.endpoint(&["chats", id.as_str()]));
        self.fetch(request, "failed to get chat").await
    }

    async fn get_messages(&self, id: &ChatId, limit: Option<u32>) -> ClientResult<Vec<Message>> {
        let mut request = self
            .client
            .get(self.endpoint(&["chats", id.as_str(), "messages"]));
        // The backend reads a zero limit as "everything".
        if let Some(limit) = limit.filter(|n| *n > 0) {
            request = request.query(&[("limit", limit)]);
        }
        self.fetch(request, "failed to get messages").await
    }

    async fn send_message(&self, id: &ChatId, content: &str) -> ClientResult<Message> {
        let body = SendMessageRequest {
            content: content.to_string(),
        };
        let request = self
            .client
            .post(self.endpoint(&["chats", id.as_str(), "messages"]))
            .json(&body);
        self.fetch(request, "failed to send message").await
    }

    async fn update_chat_title(&self, id: &ChatId, title: &str) -> ClientResult<()> {
        let body = UpdateTitleRequest {
            title: title.to_string(),
        };
        let request = self
            .client
            .put(self.endpoint(&["chats", id.as_str(), "title"]))
            .json(&body);
        self.dispatch(request, "failed to update chat title").await?;
        Ok(())
    }

    async fn delete_chat(&self, id: &ChatId) -> ClientResult<()> {
        let request = self.client.delete(self.endpoint(&["chats", id.as_str()]));
        self.dispatch(request, "failed to delete chat").await?;
        Ok(())
    }

    async fn get_stats(&self) -> ClientResult<ChatStats> {
        let request = self.client.get(self.endpoint(&["stats"]));
        self.fetch(request, "failed to get stats").await
    }

    async fn clear_all(&self) -> ClientResult<()> {
        let request = self.client.post(self.endpoint(&["admin", "clear"]));
        self.dispatch(request, "failed to clear chats").await?;
        Ok(())
    }
}
