use crate::gateway::{ApiRequest, Gateway, GatewayError};
use common_types::{Image, PresignedSlot, SaveImageRequest};

/// Presign and metadata endpoints of the upload flow. Always quiet: the
/// upload pipeline reports one outcome for the whole batch.
#[derive(Clone)]
pub struct UploadsApi {
    gateway: Gateway,
}

impl UploadsApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// One presigned slot per filename, in the same order, from a single call.
    pub async fn presign_batch(&self, filenames: &[String]) -> Result<Vec<PresignedSlot>, GatewayError> {
        let request = ApiRequest::post("upload/batch").json(filenames)?.quiet();
        self.gateway.send(request).await
    }

    pub async fn save_image(&self, image: &SaveImageRequest) -> Result<Option<Image>, GatewayError> {
        let request = ApiRequest::post("images").json(image)?.quiet();
        self.gateway.send(request).await
    }
}
