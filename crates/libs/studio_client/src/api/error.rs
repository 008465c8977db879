use crate::gateway::GatewayError;
use crate::session::SessionError;
use crate::validation::ValidationFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Rejected locally, nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(e) => e.user_message(),
            Self::Validation(e) => e.to_string(),
            Self::Session(e) => e.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Gateway(GatewayError::Decode(err))
    }
}
