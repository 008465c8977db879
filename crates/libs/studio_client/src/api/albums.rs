use crate::gateway::{ApiRequest, Gateway, GatewayError};
use common_types::{Album, CreateAlbumRequest, UpdateAlbumRequest};
use reqwest::StatusCode;

#[derive(Clone)]
pub struct AlbumsApi {
    gateway: Gateway,
    quiet: bool,
}

impl AlbumsApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            quiet: false,
        }
    }

    /// Leaves notifications to the caller.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        mut request: ApiRequest,
    ) -> Result<T, GatewayError> {
        request.quiet |= self.quiet;
        self.gateway.send(request).await
    }

    pub async fn create(&self, name: &str, event_id: i64) -> Result<Album, GatewayError> {
        let request = ApiRequest::post("albums").json(&CreateAlbumRequest {
            name: name.to_owned(),
            event_id,
        })?;
        self.send(request).await
    }

    /// The album attached to an event, if one was created already.
    pub async fn for_event(&self, event_id: i64) -> Result<Option<Album>, GatewayError> {
        let request = ApiRequest::get(format!("events/{event_id}/album")).quiet();
        match self.gateway.send(request).await {
            Err(GatewayError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Ok(None),
            other => other,
        }
    }

    pub async fn update(&self, album_id: i64, update: &UpdateAlbumRequest) -> Result<Album, GatewayError> {
        let request = ApiRequest::patch(format!("albums/{album_id}")).json(update)?;
        self.send(request).await
    }

    pub async fn set_cover(&self, album_id: i64, photo_url: &str) -> Result<Album, GatewayError> {
        self.update(
            album_id,
            &UpdateAlbumRequest {
                cover_photo: Some(photo_url.to_owned()),
                ..UpdateAlbumRequest::default()
            },
        )
        .await
    }
}
