//! In-memory stand-in for the chat backend, served over real HTTP.
//!
//! Mirrors the backend's rules: caller-chosen ids, 400 on a duplicate id,
//! 404 on an unknown chat, cascade delete, and `updated_at` advancing on
//! every write. Unlike the real backend it stores only the user turn.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Duration, NaiveDateTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use smlrag_client::models::chat::{CreateChatRequest, SendMessageRequest, UpdateTitleRequest};
use smlrag_client::{ChatId, ChatMetadata, ChatStats, Message, Role, ScanResult};

pub const MAX_MESSAGES_PER_CHAT: u32 = 100;

struct ChatEntry {
    meta: ChatMetadata,
    messages: Vec<Message>,
}

#[derive(Default)]
struct Backend {
    chats: Vec<ChatEntry>,
    last_tick: Option<NaiveDateTime>,
}

impl Backend {
    /// Wall clock, nudged forward so two writes never share a timestamp.
    fn tick(&mut self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut ChatEntry> {
        self.chats.iter_mut().find(|c| c.meta.id.as_str() == id)
    }
}

type Shared = Arc<Mutex<Backend>>;

#[derive(Deserialize)]
struct CreateParams {
    chat_id: String,
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

async fn list_chats(State(state): State<Shared>) -> Json<Vec<ChatMetadata>> {
    let backend = state.lock().unwrap();
    Json(backend.chats.iter().map(|c| c.meta.clone()).collect())
}

async fn create_chat(
    State(state): State<Shared>,
    Query(params): Query<CreateParams>,
    Json(req): Json<CreateChatRequest>,
) -> Result<Json<ChatMetadata>, StatusCode> {
    let mut backend = state.lock().unwrap();
    if backend.find_mut(&params.chat_id).is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let now = backend.tick();
    let meta = ChatMetadata {
        id: ChatId::new(params.chat_id),
        title: req.title,
        created_at: now,
        updated_at: now,
        message_count: 0,
    };
    backend.chats.push(ChatEntry {
        meta: meta.clone(),
        messages: Vec::new(),
    });
    Ok(Json(meta))
}

async fn get_chat(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<ChatMetadata>, StatusCode> {
    let mut backend = state.lock().unwrap();
    backend
        .find_mut(&id)
        .map(|c| Json(c.meta.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_messages(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Message>>, StatusCode> {
    let mut backend = state.lock().unwrap();
    let chat = backend.find_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let skip = match params.limit {
        Some(limit) if limit > 0 => chat.messages.len().saturating_sub(limit),
        _ => 0,
    };
    Ok(Json(chat.messages[skip..].to_vec()))
}

async fn send_message(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<Message>, StatusCode> {
    let mut backend = state.lock().unwrap();
    let now = backend.tick();
    let chat = backend.find_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let message = Message {
        role: Role::User,
        content: req.content,
        timestamp: now,
    };
    chat.messages.push(message.clone());
    chat.meta.message_count = chat.messages.len() as u64;
    chat.meta.updated_at = now;
    Ok(Json(message))
}

async fn update_title(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTitleRequest>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = state.lock().unwrap();
    let now = backend.tick();
    let chat = backend.find_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    chat.meta.title = req.title;
    chat.meta.updated_at = now;
    Ok(Json(json!({ "status": "ok" })))
}

async fn delete_chat(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = state.lock().unwrap();
    let before = backend.chats.len();
    backend.chats.retain(|c| c.meta.id.as_str() != id);
    if backend.chats.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "status": "ok" })))
}

async fn stats(State(state): State<Shared>) -> Json<ChatStats> {
    let backend = state.lock().unwrap();
    Json(ChatStats {
        total_chats: backend.chats.len() as u64,
        total_messages: backend.chats.iter().map(|c| c.messages.len() as u64).sum(),
        max_messages_per_chat: Some(MAX_MESSAGES_PER_CHAT),
    })
}

async fn clear(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().chats.clear();
    Json(json!({ "status": "ok" }))
}

async fn scan() -> Json<ScanResult> {
    Json(ScanResult {
        status: "success".to_string(),
        message: "scan complete".to_string(),
        files_processed: 0,
    })
}

/// Starts the fake backend on an ephemeral port and returns its `/api` base.
pub async fn spawn_backend() -> Url {
    let app = Router::new()
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/{id}", get(get_chat).delete(delete_chat))
        .route("/api/chats/{id}/messages", get(get_messages).post(send_message))
        .route("/api/chats/{id}/title", put(update_title))
        .route("/api/stats", get(stats))
        .route("/api/admin/clear", post(clear))
        .route("/api/scan", post(scan))
        .with_state(Shared::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{}/api", addr)).unwrap()
}
