//! Integration tests for capturing single chapters through the adapter

mod common;

use common::*;
use commentary_archiver::CaptureError;
use tempfile::TempDir;

#[tokio::test]
async fn test_capture_item_writes_titled_pdf() {
    let dir = TempDir::new().unwrap();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let base = adapter.base_url("1-john");
    let item = adapter
        .capture_item(&session, "1-john", &base, 4)
        .await
        .unwrap();

    assert_eq!(item.unit, "1-john");
    assert_eq!(item.item, 4);
    assert_eq!(item.title, "Study Guide: 1-john-4");
    assert_eq!(item.path, dir.path().join("1-john").join("Study Guide- 1-john-4.pdf"));
    assert_eq!(std::fs::read(&item.path).unwrap(), b"%PDF-1.4 placeholder");
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn test_capture_item_blank_title_falls_back_to_unit_and_item() {
    let dir = TempDir::new().unwrap();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new().with_blank_titles();

    let base = adapter.base_url("ruth");
    let item = adapter.capture_item(&session, "ruth", &base, 2).await.unwrap();

    assert_eq!(item.path, dir.path().join("ruth").join("ruth-2.pdf"));
    assert!(item.path.is_file());
}

#[tokio::test]
async fn test_failed_navigation_releases_surface_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new().failing_on("jude-1");

    let base = adapter.base_url("jude");
    let err = adapter
        .capture_item(&session, "jude", &base, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::Navigation { .. }));
    assert_eq!(session.opened(), 1);
    assert_eq!(session.closed(), 1);
    assert!(!dir.path().join("jude").exists());
}

#[tokio::test]
async fn test_recapture_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let base = adapter.base_url("jude");
    let target = dir.path().join("jude").join("Study Guide- jude-1.pdf");
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    std::fs::write(&target, b"stale").unwrap();

    adapter.capture_item(&session, "jude", &base, 1).await.unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.4 placeholder");
}
