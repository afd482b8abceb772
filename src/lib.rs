//! Smlrag Client - chat and dataset access layer

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use crate::config::Config;
pub use crate::error::{ClientError, ClientResult};
pub use crate::models::*;
pub use crate::services::{
    ChatApi, DatasetApi, HttpChatClient, HttpDatasetClient, RetryPolicy, Retrying,
};
pub use crate::session::ChatSession;
pub use crate::state::{StateStore, UiState, View, WatchStore};
