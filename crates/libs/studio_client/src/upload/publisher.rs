use crate::api::{AlbumsApi, UploadsApi};
use crate::gateway::{Gateway, GatewayError};
use crate::notify::{Notification, Notifier};
use crate::upload::{
    LocalFile, NavigationGuard, ProgressTracker, PublishError, StorageClient, UploadSession,
    normalize, normalized_name,
};
use app_state::UploadSettings;
use bon::bon;
use common_types::{Album, PresignedSlot, SaveImageRequest};
use futures_util::future::{join_all, try_join_all};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Publishing,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub album: Album,
    pub images: usize,
}

/// Marks the publisher as publishing for as long as it lives. Dropped without
/// [`PublishAttempt::settle`] (the publish future was cancelled), it puts the
/// publisher back to `Idle` and clears the batch progress.
struct PublishAttempt {
    state: Arc<watch::Sender<PublishState>>,
    progress: ProgressTracker,
}

impl PublishAttempt {
    fn begin(state: Arc<watch::Sender<PublishState>>, progress: ProgressTracker) -> Self {
        state.send_replace(PublishState::Publishing);
        Self { state, progress }
    }

    fn settle(self, outcome: PublishState) {
        self.state.send_replace(outcome);
    }
}

impl Drop for PublishAttempt {
    fn drop(&mut self) {
        let cancelled = self.state.send_if_modified(|state| {
            if *state == PublishState::Publishing {
                *state = PublishState::Idle;
                true
            } else {
                false
            }
        });
        if cancelled {
            warn!("Publish was cancelled before it finished");
            self.progress.clear();
        }
    }
}

/// Publishes locally selected images into an event's album.
///
/// Holds the form state of the album upload screen: selected event and its
/// album, the name for a new album, and the picked files.
pub struct AlbumPublisher {
    albums: AlbumsApi,
    uploads: UploadsApi,
    storage: StorageClient,
    notifier: Arc<dyn Notifier>,
    guard: Arc<dyn NavigationGuard>,
    settings: UploadSettings,
    progress: ProgressTracker,
    event_id: Option<i64>,
    album: Option<Album>,
    album_name: String,
    files: Vec<LocalFile>,
    state: Arc<watch::Sender<PublishState>>,
}

#[bon]
impl AlbumPublisher {
    #[builder]
    pub fn new(
        gateway: &Gateway,
        storage: StorageClient,
        settings: UploadSettings,
        guard: Arc<dyn NavigationGuard>,
    ) -> Self {
        Self {
            albums: AlbumsApi::new(gateway.clone()).quiet(),
            uploads: UploadsApi::new(gateway.clone()),
            storage,
            notifier: gateway.notifier().clone(),
            guard,
            settings,
            progress: ProgressTracker::new(),
            event_id: None,
            album: None,
            album_name: String::new(),
            files: Vec::new(),
            state: Arc::new(watch::channel(PublishState::Idle).0),
        }
    }
}

impl AlbumPublisher {
    /// Selects an event and loads the album it already has, if any.
    pub async fn select_event(&mut self, event_id: i64) -> Result<Option<&Album>, GatewayError> {
        let album = self.albums.for_event(event_id).await?;
        self.set_event(event_id, album);
        Ok(self.album.as_ref())
    }

    /// Selects an event whose album is already known.
    pub fn set_event(&mut self, event_id: i64, album: Option<Album>) {
        self.event_id = Some(event_id);
        self.album = album;
    }

    pub fn set_album_name(&mut self, name: impl Into<String>) {
        self.album_name = name.into();
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = LocalFile>) {
        self.files.extend(files);
    }

    pub fn remove_file(&mut self, name: &str) -> Option<LocalFile> {
        let index = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.remove(index))
    }

    #[must_use]
    pub fn files(&self) -> &[LocalFile] {
        &self.files
    }

    #[must_use]
    pub fn album(&self) -> Option<&Album> {
        self.album.as_ref()
    }

    #[must_use]
    pub fn album_name(&self) -> &str {
        &self.album_name
    }

    #[must_use]
    pub fn state(&self) -> PublishState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<PublishState> {
        self.state.subscribe()
    }

    #[must_use]
    pub const fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// The whole form is disabled without an event or while publishing.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.event_id.is_none() || self.state() == PublishState::Publishing
    }

    /// Uploads every selected file into the event's album, creating the album
    /// first when the event has none.
    ///
    /// Files are uploaded concurrently; the batch fails if any file fails, but
    /// files that made it are left in place.
    pub async fn publish(&mut self) -> Result<PublishReport, PublishError> {
        if let Err(e) = self.check_preconditions() {
            self.notifier.notify(Notification::warning(e.to_string()));
            return Err(e);
        }

        let attempt = PublishAttempt::begin(self.state.clone(), self.progress.clone());
        let session = UploadSession::begin(self.guard.clone());
        let result = self.run_batch().await;
        drop(session);

        match result {
            Ok(report) => {
                attempt.settle(PublishState::Done);
                self.files.clear();
                self.album_name.clear();
                self.progress.clear();
                info!(
                    "Published {} images to album {}",
                    report.images, report.album.name
                );
                self.notifier.notify(Notification::success(format!(
                    "Uploaded {} images to {}",
                    report.images, report.album.name
                )));
                Ok(report)
            }
            Err(e) => {
                attempt.settle(PublishState::Failed);
                error!("Publishing failed: {e}");
                self.notifier
                    .notify(Notification::error("Upload failed. Please try again."));
                Err(e)
            }
        }
    }

    fn check_preconditions(&self) -> Result<(), PublishError> {
        if self.state() == PublishState::Publishing {
            return Err(PublishError::AlreadyPublishing);
        }
        if self.event_id.is_none() {
            return Err(PublishError::NoEvent);
        }
        if self.album.is_none() && self.album_name.trim().is_empty() {
            return Err(PublishError::MissingAlbumName);
        }
        if self.files.is_empty() {
            return Err(PublishError::NoFiles);
        }
        let mut names = HashSet::new();
        for file in &self.files {
            let name = normalized_name(file, &self.settings);
            if !names.insert(name.clone()) {
                return Err(PublishError::DuplicateName(name));
            }
        }
        Ok(())
    }

    async fn run_batch(&mut self) -> Result<PublishReport, PublishError> {
        let event_id = self.event_id.ok_or(PublishError::NoEvent)?;
        let album = match &self.album {
            Some(album) => album.clone(),
            None => {
                let album = self
                    .albums
                    .create(self.album_name.trim(), event_id)
                    .await?;
                info!("Created album {} ({})", album.name, album.id);
                self.album = Some(album.clone());
                album
            }
        };

        let files = try_join_all(
            self.files
                .iter()
                .cloned()
                .map(|file| normalize(file, &self.settings)),
        )
        .await?;
        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();

        let slots = self.uploads.presign_batch(&names).await?;
        if slots.len() != files.len() {
            return Err(PublishError::SlotMismatch {
                expected: files.len(),
                received: slots.len(),
            });
        }

        self.progress.start(&names);
        let results = join_all(
            files
                .iter()
                .zip(&slots)
                .enumerate()
                .map(|(index, (file, slot))| self.upload_one(album.id, index, file, slot)),
        )
        .await;

        let mut first_error = None;
        for (file, result) in files.iter().zip(results) {
            if let Err(e) = result {
                warn!("Upload of {} failed: {e}", file.name);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(PublishReport {
            album,
            images: files.len(),
        })
    }

    /// PUT, then metadata, then (first file only) the cover photo.
    async fn upload_one(
        &self,
        album_id: i64,
        index: usize,
        file: &LocalFile,
        slot: &PresignedSlot,
    ) -> Result<(), PublishError> {
        self.storage.put(slot, file, &self.progress).await?;

        self.uploads
            .save_image(&SaveImageRequest {
                image_id: slot.object_key.clone(),
                path: slot.view_url.clone(),
                album_id,
                order: u32::try_from(index + 1).unwrap_or(u32::MAX),
            })
            .await?;

        if index == 0 {
            if let Err(e) = self.albums.set_cover(album_id, &slot.view_url).await {
                warn!("Could not set cover photo of album {album_id}: {e}");
                self.notifier.notify(Notification::warning(
                    "Images uploaded, but the cover photo could not be set",
                ));
            }
        }
        Ok(())
    }
}
