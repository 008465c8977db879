use crate::{LoggingSettings, RawSettings, SessionSettings, StorageSettings};
use color_eyre::eyre::{Result, bail, eyre};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub upload: UploadSettings,
    pub session: SessionSettings,
    pub payment: PaymentSettings,
    pub logging: LoggingSettings,
}

/// Configuration for the studio backend.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_auth_retries: u32,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub jpeg_quality: u8,
    pub canonical_extension: String,
    pub chunk_size: usize,
}

#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub checkout_url: Url,
    pub return_url: Url,
    pub cancel_url: Url,
    pub merchant_id: String,
    pub currency: String,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        // Joining relative paths onto the base url drops its last segment
        // unless it ends with a slash.
        let mut base_url = raw.api.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|e| eyre!("Invalid api.base_url {}: {e}", raw.api.base_url))?;

        if !(1..=100).contains(&raw.upload.jpeg_quality) {
            bail!(
                "upload.jpeg_quality must be within 1..=100, got {}",
                raw.upload.jpeg_quality
            );
        }
        if raw.upload.chunk_size_kb == 0 {
            bail!("upload.chunk_size_kb must be greater than 0");
        }

        let parse = |name: &str, value: &str| {
            Url::parse(value).map_err(|e| eyre!("Invalid payment.{name} {value}: {e}"))
        };
        let payment = PaymentSettings {
            checkout_url: parse("checkout_url", &raw.payment.checkout_url)?,
            return_url: parse("return_url", &raw.payment.return_url)?,
            cancel_url: parse("cancel_url", &raw.payment.cancel_url)?,
            merchant_id: raw.payment.merchant_id,
            currency: raw.payment.currency,
        };

        Ok(Self {
            api: ApiSettings {
                base_url,
                connect_timeout: Duration::from_secs(raw.api.connect_timeout_secs),
                timeout: Duration::from_secs(raw.api.timeout_secs),
                max_auth_retries: raw.api.max_auth_retries,
            },
            storage: raw.storage,
            upload: UploadSettings {
                jpeg_quality: raw.upload.jpeg_quality,
                canonical_extension: raw
                    .upload
                    .canonical_extension
                    .trim_start_matches('.')
                    .to_lowercase(),
                chunk_size: raw.upload.chunk_size_kb * 1024,
            },
            session: raw.session,
            payment,
            logging: raw.logging,
        })
    }
}

impl StorageSettings {
    /// Whether requests to this host must never carry the bearer credential.
    #[must_use]
    pub fn is_exempt_host(&self, host: &str) -> bool {
        self.exempt_hosts
            .iter()
            .any(|h| host == h || host.ends_with(&format!(".{h}")))
    }
}
