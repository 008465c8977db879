mod common;

use common::{TestBackend, TestClient, client, spawn_backend, upload_settings};
use reqwest::StatusCode;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use studio_client::{GatewayError, NotificationLevel};
use studio_client::upload::{
    AlbumPublisher, FlagGuard, LocalFile, PublishError, PublishState, StorageClient, UploadError,
};

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 120, 40, 255]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn wedding_files() -> Vec<LocalFile> {
    vec![
        LocalFile::new("ceremony.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4]),
        LocalFile::new("portrait.png", png_bytes()),
        LocalFile::new("reception.jpeg", vec![0xFF, 0xD8, 0xFF, 0xE1, 5, 6, 7]),
    ]
}

async fn setup() -> (TestBackend, TestClient, Arc<FlagGuard>, AlbumPublisher) {
    let backend = spawn_backend().await;
    let client = client(&backend, Some(("access-0", "refresh-0")));
    let guard = Arc::new(FlagGuard::new());
    let publisher = AlbumPublisher::builder()
        .gateway(&client.gateway)
        .storage(StorageClient::new(reqwest::Client::new(), "public-read", 1024))
        .settings(upload_settings())
        .guard(guard.clone())
        .build();
    (backend, client, guard, publisher)
}

#[tokio::test]
async fn publishes_new_album_with_cover() {
    let (backend, client, guard, mut publisher) = setup().await;
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(wedding_files());

    let report = publisher.publish().await.unwrap();

    assert_eq!(report.album.name, "Smith Wedding");
    assert_eq!(report.images, 3);
    let recorded = &backend.recorded;
    assert_eq!(
        *recorded.albums_created.lock().unwrap(),
        vec![json!({ "name": "Smith Wedding", "event_id": 7 })]
    );
    assert_eq!(
        *recorded.presign_calls.lock().unwrap(),
        vec![vec![
            "ceremony.jpg".to_owned(),
            "portrait.jpg".to_owned(),
            "reception.jpeg".to_owned(),
        ]]
    );

    let mut puts = recorded.storage_puts.lock().unwrap().clone();
    puts.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(puts.len(), 3);
    for put in &puts {
        assert_eq!(put.acl.as_deref(), Some("public-read"));
        assert_eq!(put.authorization, None);
        assert_eq!(put.content_type.as_deref(), Some("image/jpeg"));
        assert!(put.size > 0);
    }

    let saved = recorded.images_saved.lock().unwrap().clone();
    assert_eq!(saved.len(), 3);
    let first = saved.iter().find(|s| s["order"] == 1).unwrap();
    assert_eq!(first["image_id"], "uploads/ceremony.jpg");
    assert_eq!(first["album_id"], report.album.id);
    assert!(saved.iter().any(|s| s["order"] == 2 && s["image_id"] == "uploads/portrait.jpg"));

    let cover = format!("{}/storage/view/ceremony.jpg", backend.origin);
    assert_eq!(
        *recorded.cover_patches.lock().unwrap(),
        vec![(report.album.id, json!({ "cover_photo": cover }))]
    );

    assert_eq!(guard.sessions(), 1);
    assert!(!guard.is_armed());
    assert_eq!(publisher.state(), PublishState::Done);
    assert!(publisher.files().is_empty());
    assert_eq!(publisher.album_name(), "");
    assert!(publisher.progress().snapshot().is_empty());

    assert_eq!(client.notifier.of_level(NotificationLevel::Success).len(), 1);
    assert!(client.notifier.of_level(NotificationLevel::Error).is_empty());
}

#[tokio::test]
async fn reuses_existing_event_album() {
    let (backend, _client, _guard, mut publisher) = setup().await;
    *backend.recorded.existing_album.lock().unwrap() =
        Some(json!({ "id": 9, "name": "Perera Engagement", "event_id": 3, "cover_photo": null }));

    let album = publisher.select_event(3).await.unwrap().cloned();
    assert_eq!(album.map(|a| a.id), Some(9));
    publisher.add_files(vec![LocalFile::new("ring.jpg", vec![0xFF, 0xD8, 9])]);

    let report = publisher.publish().await.unwrap();

    assert_eq!(report.album.id, 9);
    assert!(backend.recorded.albums_created.lock().unwrap().is_empty());
    assert_eq!(backend.recorded.cover_patches.lock().unwrap()[0].0, 9);
}

#[tokio::test]
async fn event_without_album_loads_as_none() {
    let (_backend, _client, _guard, mut publisher) = setup().await;

    let album = publisher.select_event(12).await.unwrap();

    assert!(album.is_none());
    assert!(!publisher.is_disabled());
}

#[tokio::test]
async fn empty_selection_makes_no_network_calls() {
    let (backend, client, guard, mut publisher) = setup().await;
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");

    let error = publisher.publish().await.unwrap_err();

    assert!(matches!(error, PublishError::NoFiles));
    assert!(error.is_precondition());
    assert!(backend.recorded.albums_created.lock().unwrap().is_empty());
    assert!(backend.recorded.presign_calls.lock().unwrap().is_empty());
    assert!(backend.recorded.auth_headers().is_empty());
    assert_eq!(guard.sessions(), 0);
    let warnings = client.notifier.of_level(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "Please select at least one image");
}

#[tokio::test]
async fn publish_requires_event_and_album_name() {
    let (_backend, _client, _guard, mut publisher) = setup().await;
    publisher.add_files(wedding_files());

    assert!(publisher.is_disabled());
    assert!(matches!(
        publisher.publish().await,
        Err(PublishError::NoEvent)
    ));

    publisher.set_event(7, None);
    publisher.set_album_name("   ");
    assert!(matches!(
        publisher.publish().await,
        Err(PublishError::MissingAlbumName)
    ));
}

#[tokio::test]
async fn failed_put_fails_batch_without_rollback() {
    let (backend, client, guard, mut publisher) = setup().await;
    *backend.recorded.fail_put.lock().unwrap() = Some("reception.jpeg".to_owned());
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(wedding_files());

    let error = publisher.publish().await.unwrap_err();

    match error {
        PublishError::Upload(UploadError::Storage { name, .. }) => {
            assert_eq!(name, "reception.jpeg");
        }
        other => panic!("expected a storage error, got {other:?}"),
    }
    let recorded = &backend.recorded;
    assert_eq!(recorded.albums_created.lock().unwrap().len(), 1);
    assert_eq!(recorded.storage_puts.lock().unwrap().len(), 2);
    assert_eq!(recorded.images_saved.lock().unwrap().len(), 2);
    assert_eq!(recorded.cover_patches.lock().unwrap().len(), 1);

    assert_eq!(publisher.state(), PublishState::Failed);
    assert_eq!(publisher.files().len(), 3);
    assert!(publisher.album().is_some());
    assert!(!guard.is_armed());

    let errors = client.notifier.of_level(NotificationLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Upload failed. Please try again.");
    assert!(client.notifier.of_level(NotificationLevel::Success).is_empty());
}

#[tokio::test]
async fn removed_file_is_not_uploaded() {
    let (backend, _client, _guard, mut publisher) = setup().await;
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(wedding_files());

    assert!(publisher.remove_file("portrait.png").is_some());
    assert!(publisher.remove_file("missing.png").is_none());
    publisher.publish().await.unwrap();

    assert_eq!(
        *backend.recorded.presign_calls.lock().unwrap(),
        vec![vec!["ceremony.jpg".to_owned(), "reception.jpeg".to_owned()]]
    );
}

#[tokio::test]
async fn cover_failure_is_only_a_warning() {
    let (backend, client, _guard, mut publisher) = setup().await;
    backend.recorded.fail_cover.store(true, Ordering::SeqCst);
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(wedding_files());

    let report = publisher.publish().await.unwrap();

    assert_eq!(report.images, 3);
    assert_eq!(backend.recorded.images_saved.lock().unwrap().len(), 3);
    assert!(backend.recorded.cover_patches.lock().unwrap().is_empty());
    assert_eq!(publisher.state(), PublishState::Done);

    let warnings = client.notifier.of_level(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].message,
        "Images uploaded, but the cover photo could not be set"
    );
    assert_eq!(client.notifier.of_level(NotificationLevel::Success).len(), 1);
    assert!(client.notifier.of_level(NotificationLevel::Error).is_empty());
}

#[tokio::test]
async fn failed_metadata_save_fails_batch() {
    let (backend, client, guard, mut publisher) = setup().await;
    *backend.recorded.fail_save.lock().unwrap() = Some("uploads/portrait.jpg".to_owned());
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(wedding_files());

    let error = publisher.publish().await.unwrap_err();

    assert!(matches!(
        error,
        PublishError::Gateway(GatewayError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            ..
        })
    ));
    let recorded = &backend.recorded;
    assert_eq!(recorded.storage_puts.lock().unwrap().len(), 3);
    let mut saved: Vec<String> = recorded
        .images_saved
        .lock()
        .unwrap()
        .iter()
        .map(|s| s["image_id"].as_str().unwrap().to_owned())
        .collect();
    saved.sort();
    assert_eq!(saved, vec!["uploads/ceremony.jpg", "uploads/reception.jpeg"]);
    assert_eq!(recorded.cover_patches.lock().unwrap().len(), 1);

    assert_eq!(publisher.state(), PublishState::Failed);
    assert_eq!(publisher.files().len(), 3);
    assert!(!guard.is_armed());
    let errors = client.notifier.of_level(NotificationLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Upload failed. Please try again.");
    assert!(client.notifier.of_level(NotificationLevel::Success).is_empty());
}

#[tokio::test]
async fn cancelled_publish_returns_to_idle() {
    let (backend, _client, guard, mut publisher) = setup().await;
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(wedding_files());

    let cancelled = tokio::time::timeout(Duration::ZERO, publisher.publish()).await;

    assert!(cancelled.is_err());
    assert_eq!(guard.sessions(), 1);
    assert!(!guard.is_armed());
    assert_eq!(publisher.state(), PublishState::Idle);
    assert!(!publisher.is_disabled());
    assert!(publisher.progress().snapshot().is_empty());
    assert_eq!(publisher.files().len(), 3);

    let report = publisher.publish().await.unwrap();

    assert_eq!(report.images, 3);
    assert_eq!(publisher.state(), PublishState::Done);
    assert_eq!(backend.recorded.images_saved.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn converted_names_must_not_collide() {
    let (backend, client, guard, mut publisher) = setup().await;
    publisher.set_event(7, None);
    publisher.set_album_name("Smith Wedding");
    publisher.add_files(vec![
        LocalFile::new("shoot.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]),
        LocalFile::new("shoot.png", png_bytes()),
    ]);

    let error = publisher.publish().await.unwrap_err();

    match &error {
        PublishError::DuplicateName(name) => assert_eq!(name, "shoot.jpg"),
        other => panic!("expected a duplicate name, got {other:?}"),
    }
    assert!(error.is_precondition());
    assert!(backend.recorded.albums_created.lock().unwrap().is_empty());
    assert!(backend.recorded.presign_calls.lock().unwrap().is_empty());
    assert_eq!(guard.sessions(), 0);
    let warnings = client.notifier.of_level(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].message,
        "Two selected images would both upload as shoot.jpg"
    );
}
