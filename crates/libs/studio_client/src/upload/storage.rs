use crate::upload::{LocalFile, ProgressTracker, UploadError};
use bytes::Bytes;
use common_types::PresignedSlot;
use futures_util::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use tracing::debug;

/// Uploads straight to object storage through presigned urls, bypassing the gateway.
#[derive(Clone, Debug)]
pub struct StorageClient {
    http: Client,
    acl: String,
    chunk_size: usize,
}

impl StorageClient {
    #[must_use]
    pub fn new(http: Client, acl: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            http,
            acl: acl.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// PUTs the file to its slot, reporting progress as the body is streamed.
    pub async fn put(
        &self,
        slot: &PresignedSlot,
        file: &LocalFile,
        progress: &ProgressTracker,
    ) -> Result<(), UploadError> {
        let total = file.bytes.len() as u64;
        let chunks: Vec<Bytes> = (0..file.bytes.len())
            .step_by(self.chunk_size)
            .map(|start| {
                let end = (start + self.chunk_size).min(file.bytes.len());
                file.bytes.slice(start..end)
            })
            .collect();

        let tracker = progress.clone();
        let name = file.name.clone();
        let mut sent = 0u64;
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            tracker.update(&name, sent, total);
            Ok::<_, std::io::Error>(chunk)
        }));

        let response = self
            .http
            .put(&slot.presigned_url)
            .header(CONTENT_TYPE, &file.content_type)
            .header(CONTENT_LENGTH, total)
            .header("x-amz-acl", &self.acl)
            .body(Body::wrap_stream(body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Storage {
                name: file.name.clone(),
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        progress.complete(&file.name);
        debug!("Stored {} as {}", file.name, slot.object_key);
        Ok(())
    }
}
