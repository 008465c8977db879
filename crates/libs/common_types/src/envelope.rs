use serde::{Deserialize, Serialize};

/// Uniform wrapper the backend puts around most successful responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Body of a non-2xx response. Both fields are optional on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}
