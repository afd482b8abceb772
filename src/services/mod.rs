pub mod chat_client;
pub mod dataset_client;
pub mod retry;

// Re-export for convenience
pub use chat_client::{ChatApi, HttpChatClient};
pub use dataset_client::{DatasetApi, HttpDatasetClient};
pub use retry::{RetryPolicy, Retrying};

use reqwest::Url;

/// Appends path segments to a base URL, percent-encoding each one.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keeps_base_path() {
        let base = Url::parse("http://localhost:5301/api").unwrap();
        let url = join_segments(&base, &["chats", "c1", "messages"]);
        assert_eq!(url.as_str(), "http://localhost:5301/api/chats/c1/messages");
    }

    #[test]
    fn test_join_handles_trailing_slash() {
        let base = Url::parse("http://localhost:5301/api/").unwrap();
        let url = join_segments(&base, &["stats"]);
        assert_eq!(url.as_str(), "http://localhost:5301/api/stats");
    }

    #[test]
    fn test_join_encodes_ids() {
        let base = Url::parse("http://localhost/api").unwrap();
        let url = join_segments(&base, &["chats", "a/b c"]);
        assert_eq!(url.as_str(), "http://localhost/api/chats/a%2Fb%20c");
    }
}
