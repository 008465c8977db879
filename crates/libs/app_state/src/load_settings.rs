use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

const SETTINGS_PATH: &str = "config/settings.yaml";

/// Loads `config/settings.yaml`, with `APP__SECTION__KEY` environment overrides.
pub fn load_app_settings() -> Result<AppSettings> {
    // Load .env first so it can override values through the environment.
    dotenv::from_path(".env").ok();
    load_app_settings_from(Path::new(SETTINGS_PATH))
}

pub fn load_app_settings_from(path: &Path) -> Result<AppSettings> {
    let config_path = path.canonicalize()?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    AppSettings::try_from(raw_settings)
}

pub static SETTINGS: LazyLock<AppSettings> =
    LazyLock::new(|| load_app_settings().expect("Cannot load app settings."));

#[must_use]
pub fn settings() -> &'static AppSettings {
    &SETTINGS
}

#[cfg(test)]
mod tests {
    use super::load_app_settings_from;
    use std::io::Write;

    const YAML: &str = r"
api:
  base_url: http://localhost:3000/api
  connect_timeout_secs: 5
  timeout_secs: 30
storage:
  exempt_hosts: [amazonaws.com]
  acl: public-read
upload:
  jpeg_quality: 90
  canonical_extension: .JPG
  chunk_size_kb: 64
session:
  path: .studio/session.json
payment:
  checkout_url: https://sandbox.payhere.lk/pay/checkout
  return_url: http://localhost:5173/payment/success
  cancel_url: http://localhost:5173/payment/cancel
  merchant_id: '1221149'
  currency: LKR
logging:
  level: info
";

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn loads_and_normalizes() -> color_eyre::Result<()> {
        let file = write_settings(YAML);
        let settings = load_app_settings_from(file.path())?;

        assert_eq!(settings.api.base_url.as_str(), "http://localhost:3000/api/");
        assert_eq!(settings.api.max_auth_retries, 1);
        assert_eq!(settings.upload.canonical_extension, "jpg");
        assert_eq!(settings.upload.chunk_size, 64 * 1024);
        assert!(settings.storage.is_exempt_host("bucket.s3.amazonaws.com"));
        assert!(!settings.storage.is_exempt_host("localhost"));
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let file = write_settings(&YAML.replace("jpeg_quality: 90", "jpeg_quality: 0"));
        assert!(load_app_settings_from(file.path()).is_err());
    }
}
