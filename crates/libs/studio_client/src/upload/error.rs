use crate::gateway::GatewayError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not convert {name}: {source}")]
    Convert {
        name: String,
        source: image::ImageError,
    },

    #[error("Conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Storage upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage rejected {name} with status {status}: {body}")]
    Storage {
        name: String,
        status: StatusCode,
        body: String,
    },
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Please select an event first")]
    NoEvent,

    #[error("Please enter an album name")]
    MissingAlbumName,

    #[error("Please select at least one image")]
    NoFiles,

    #[error("Two selected images would both upload as {0}")]
    DuplicateName(String),

    #[error("A publish is already in progress")]
    AlreadyPublishing,

    #[error("Expected {expected} upload slots, received {received}")]
    SlotMismatch { expected: usize, received: usize },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl PublishError {
    /// Rejected before any network activity.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoEvent
                | Self::MissingAlbumName
                | Self::NoFiles
                | Self::DuplicateName(_)
                | Self::AlreadyPublishing
        )
    }
}
