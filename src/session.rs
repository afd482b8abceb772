//! Keeps the UI stores in step with chat-client results.
//!
//! State only changes after the backend call succeeds, so a failed call
//! leaves the active chat and current view untouched.

use std::sync::Arc;
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::models::{ChatId, ChatMetadata, Message};
use crate::services::chat_client::ChatApi;
use crate::state::{StateStore, UiState, View};

pub struct ChatSession {
    chats: Arc<dyn ChatApi>,
    state: UiState,
}

impl ChatSession {
    pub fn new(chats: Arc<dyn ChatApi>, state: UiState) -> Self {
        Self { chats, state }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn active_chat(&self) -> Option<ChatId> {
        self.state.active_chat.get()
    }

    /// Creates a chat under a fresh id, makes it active and shows the chat view.
    pub async fn start_chat(&self, title: Option<String>) -> ClientResult<ChatMetadata> {
        let id = ChatId::generate();
        let chat = self.chats.create_chat(&id, title).await?;

        self.state.active_chat.set(Some(chat.id.clone()));
        self.state.current_view.set(View::Chat);
        info!("Started chat {} ({})", chat.id, chat.title);
        Ok(chat)
    }

    /// Makes an existing chat active once the backend confirms it exists.
    pub async fn open_chat(&self, id: &ChatId) -> ClientResult<ChatMetadata> {
        let chat = self.chats.get_chat(id).await?;

        self.state.active_chat.set(Some(chat.id.clone()));
        self.state.current_view.set(View::Chat);
        Ok(chat)
    }

    /// Deletes the chat and clears the active id if it pointed at it.
    pub async fn delete_chat(&self, id: &ChatId) -> ClientResult<()> {
        self.chats.delete_chat(id).await?;

        let cleared = self.state.active_chat.modify(|active| {
            if active.as_ref() == Some(id) {
                *active = None;
                true
            } else {
                false
            }
        });
        if cleared {
            info!("Deleted active chat {}", id);
        }
        Ok(())
    }

    /// Sends `content` to the active chat.
    pub async fn send(&self, content: &str) -> ClientResult<Message> {
        let id = self.require_active()?;
        self.chats.send_message(&id, content).await
    }

    /// History of the active chat.
    pub async fn history(&self, limit: Option<u32>) -> ClientResult<Vec<Message>> {
        let id = self.require_active()?;
        self.chats.get_messages(&id, limit).await
    }

    fn require_active(&self) -> ClientResult<ChatId> {
        self.active_chat()
            .ok_or_else(|| ClientError::Validation("no active chat".to_string()))
    }
}
