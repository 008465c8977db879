use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub event_id: Option<i64>,
    pub cover_photo: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateAlbumRequest {
    pub name: String,
    pub event_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateAlbumRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
}

/// One direct-to-storage upload target, issued per filename.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresignedSlot {
    pub object_key: String,
    pub presigned_url: String,
    pub view_url: String,
}

/// Metadata registered for an image once its bytes are in storage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SaveImageRequest {
    pub image_id: String,
    pub path: String,
    pub album_id: i64,
    /// 1-based position inside the batch.
    pub order: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Image {
    pub id: i64,
    pub image_id: String,
    pub path: String,
    pub album_id: i64,
    pub order: u32,
}
