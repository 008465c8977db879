use crate::upload::UploadError;
use app_state::UploadSettings;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;
use tracing::debug;

const JPEG: &str = "image/jpeg";

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self {
            name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        Ok(Self::new(name, bytes))
    }

    #[must_use]
    pub fn is_jpeg(&self) -> bool {
        self.content_type == JPEG
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The name a file will be uploaded under once [`normalize`] has run.
#[must_use]
pub fn normalized_name(file: &LocalFile, settings: &UploadSettings) -> String {
    if file.is_jpeg() {
        return file.name.clone();
    }
    Path::new(&file.name)
        .with_extension(&settings.canonical_extension)
        .to_string_lossy()
        .to_string()
}

/// Re-encodes an image as JPEG. JPEG input is returned untouched.
pub async fn normalize(file: LocalFile, settings: &UploadSettings) -> Result<LocalFile, UploadError> {
    if file.is_jpeg() {
        return Ok(file);
    }

    let quality = settings.jpeg_quality;
    let name = normalized_name(&file, settings);
    let original_name = file.name.clone();

    let encoded = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, image::ImageError> {
        // JPEG has no alpha channel.
        let rgb = image::load_from_memory(&file.bytes)?.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&rgb)?;
        Ok(buffer)
    })
    .await?
    .map_err(|source| UploadError::Convert {
        name: original_name.clone(),
        source,
    })?;

    debug!("Converted {original_name} to {name} ({} bytes)", encoded.len());
    Ok(LocalFile {
        name,
        content_type: JPEG.to_owned(),
        bytes: Bytes::from(encoded),
    })
}
