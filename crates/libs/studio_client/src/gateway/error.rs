use crate::session::SessionError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The server answered 2xx but the envelope said `success: false`.
    #[error("{message}")]
    Domain { message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl GatewayError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The message best suited to show a user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Domain { message } => message.clone(),
            Self::Transport(_) => "Network error, please check your connection.".to_owned(),
            Self::Decode(_) => "Unexpected response from the server.".to_owned(),
            other => other.to_string(),
        }
    }
}
