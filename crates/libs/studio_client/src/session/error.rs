use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Not logged in")]
    NoSession,

    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for SessionError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
