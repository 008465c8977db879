use serde::Deserialize;
use std::path::PathBuf;

/// Settings exactly as they appear in `config/settings.yaml`, before validation.
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: RawApiSettings,
    pub storage: StorageSettings,
    pub upload: RawUploadSettings,
    pub session: SessionSettings,
    pub payment: RawPaymentSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawApiSettings {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// How many times a request may be replayed after a 401 + token refresh.
    #[serde(default = "default_max_auth_retries")]
    pub max_auth_retries: u32,
}

const fn default_max_auth_retries() -> u32 {
    1
}

/// Direct-to-storage uploads.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Hosts that never receive the bearer credential, even when a request
    /// for them is routed through the gateway.
    #[serde(default)]
    pub exempt_hosts: Vec<String>,
    /// Value for the `x-amz-acl` header on presigned PUTs.
    pub acl: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawUploadSettings {
    /// JPEG quality for re-encoded images, 1..=100.
    pub jpeg_quality: u8,
    pub canonical_extension: String,
    /// Size of the chunks the upload body is streamed in, used for progress reporting.
    pub chunk_size_kb: usize,
}

/// Where the access/refresh token pair is persisted between runs.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawPaymentSettings {
    pub checkout_url: String,
    pub return_url: String,
    pub cancel_url: String,
    pub merchant_id: String,
    pub currency: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}
