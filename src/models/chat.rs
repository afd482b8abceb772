use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::ChatId;

/// Author of a chat turn. The backend knows no other roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted chat turn. Never updated after the server stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(with = "super::wire_time")]
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMetadata {
    pub id: ChatId,
    pub title: String,
    #[serde(with = "super::wire_time")]
    pub created_at: NaiveDateTime,
    /// Advances on every appended message and every title change.
    #[serde(with = "super::wire_time")]
    pub updated_at: NaiveDateTime,
    pub message_count: u64,
}

/// Point-in-time aggregate; not consistent with concurrent writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStats {
    pub total_chats: u64,
    pub total_messages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_messages_per_chat: Option<u32>,
}

// ==================== REQUEST BODIES ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTitleRequest {
    pub title: String,
}
