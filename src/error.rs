use reqwest::StatusCode;
use thiserror::Error;

/// Every failure a client operation can surface.
///
/// The chat service only ever produces [`ClientError::Transport`]; the dataset
/// catalog adds [`ClientError::Validation`] and [`ClientError::Envelope`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// A client-side precondition failed. No request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-2xx status, network failure, or an undecodable bare body.
    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// The dataset catalog answered with a body that is not `{code, message, data}`.
    #[error("Invalid response envelope: {0}")]
    Envelope(String),
}

impl ClientError {
    pub(crate) fn transport(message: impl Into<String>, status: Option<StatusCode>) -> Self {
        ClientError::Transport {
            message: message.into(),
            status: status.map(|s| s.as_u16()),
        }
    }

    /// HTTP status of the failed call, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Network failures, timeouts, throttling and 5xx. Any other status
    /// would come back the same on another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport { status: None, .. } => true,
            ClientError::Transport {
                status: Some(code), ..
            } => matches!(*code, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
