//! Process-wide UI state: which chat is active and which view is showing.
//!
//! Each value lives in its own [`WatchStore`]. Writes replace the value
//! atomically and the last write wins; subscribers see either the old or the
//! new value. Nothing here talks to the backend, so an active chat id may
//! point at a chat that no longer exists.

mod store;
mod view;

pub use store::{StateStore, WatchStore};
pub use view::{UnknownView, View};

use crate::models::ChatId;

pub type ActiveChatStore = WatchStore<Option<ChatId>>;
pub type CurrentViewStore = WatchStore<View>;

/// The two stores, bundled so they can be injected together.
/// Clones share the same underlying values.
#[derive(Clone)]
pub struct UiState {
    pub active_chat: ActiveChatStore,
    pub current_view: CurrentViewStore,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            active_chat: WatchStore::new(None),
            current_view: WatchStore::new(View::default()),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
