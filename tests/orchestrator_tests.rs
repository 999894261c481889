//! Integration tests for the sequential orchestrator
//!
//! These drive full runs against the in-process browser double from
//! `common`, writing placeholder PDFs into a temporary output root.

mod common;

use common::*;
use commentary_archiver::catalog::Catalog;
use commentary_archiver::orchestrator::Orchestrator;
use commentary_archiver::resume::{pending_units, OutputSnapshot};
use commentary_archiver::{ArchiveError, CatalogError, RunState};
use std::time::Duration;
use tempfile::TempDir;

const DELAY: Duration = Duration::from_millis(2000);

#[tokio::test]
async fn test_run_without_failures() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();
    let pause = RecordingPause::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, pause.clone(), DELAY);
    let progress = orchestrator
        .run(&names(&["alpha", "beta", "gamma"]))
        .await;

    assert_eq!(progress.state(), RunState::Completed);
    assert_eq!(progress.total_units, 3);
    assert_eq!(progress.completed_units, 3);
    assert!(progress.failed_units.is_empty());
    assert_eq!(progress.items_captured, 6);
    assert_eq!(progress.current_unit, None);

    assert_eq!(
        session.navigations(),
        vec![
            "https://commentary.test/guide/alpha/alpha-1.cfm",
            "https://commentary.test/guide/alpha/alpha-2.cfm",
            "https://commentary.test/guide/beta/beta-1.cfm",
            "https://commentary.test/guide/beta/beta-2.cfm",
            "https://commentary.test/guide/beta/beta-3.cfm",
            "https://commentary.test/guide/gamma/gamma-1.cfm",
        ]
    );

    assert!(dir.path().join("alpha").join("Study Guide- alpha-1.pdf").is_file());
    assert!(dir.path().join("beta").join("Study Guide- beta-3.pdf").is_file());
    assert!(dir.path().join("gamma").join("Study Guide- gamma-1.pdf").is_file());

    // One pause between each pair of consecutive books, none after the last
    assert_eq!(pause.recorded(), vec![DELAY, DELAY]);
}

#[tokio::test]
async fn test_failed_book_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new().failing_on("beta-2");
    let pause = RecordingPause::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, pause.clone(), DELAY);
    let progress = orchestrator
        .run(&names(&["alpha", "beta", "gamma"]))
        .await;

    assert_eq!(progress.state(), RunState::CompletedWithFailures);
    assert_eq!(progress.failed_units, vec!["beta"]);
    assert_eq!(progress.completed_units, 3);
    assert_eq!(progress.succeeded_units(), 2);

    // beta stops at its first failed chapter; gamma still runs
    let navigations = session.navigations();
    assert!(navigations.contains(&"https://commentary.test/guide/beta/beta-2.cfm".to_string()));
    assert!(!navigations.contains(&"https://commentary.test/guide/beta/beta-3.cfm".to_string()));
    assert_eq!(
        navigations.last().map(String::as_str),
        Some("https://commentary.test/guide/gamma/gamma-1.cfm")
    );

    // alpha-1, alpha-2, beta-1, gamma-1
    assert_eq!(progress.items_captured, 4);
    assert!(dir.path().join("beta").join("Study Guide- beta-1.pdf").is_file());
    assert_eq!(pause.recorded().len(), 2);
}

#[tokio::test]
async fn test_every_surface_is_closed() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new().failing_on("alpha-1").failing_on("gamma");

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let progress = orchestrator
        .run(&names(&["alpha", "beta", "gamma"]))
        .await;

    assert_eq!(progress.failed_units, vec!["alpha", "gamma"]);
    assert_eq!(session.opened(), 5);
    assert_eq!(session.closed(), session.opened());
}

#[tokio::test]
async fn test_unknown_target_is_a_failure_not_a_crash() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let progress = orchestrator.run(&names(&["delta", "gamma"])).await;

    assert_eq!(progress.failed_units, vec!["delta"]);
    assert_eq!(progress.state(), RunState::CompletedWithFailures);
    assert_eq!(
        session.navigations(),
        vec!["https://commentary.test/guide/gamma/gamma-1.cfm"]
    );
}

#[tokio::test]
async fn test_empty_run_completes_without_work() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();
    let pause = RecordingPause::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, pause.clone(), DELAY);
    let progress = orchestrator.run(&[]).await;

    assert_eq!(progress.state(), RunState::Completed);
    assert!(progress.is_empty_run());
    assert!(session.navigations().is_empty());
    assert!(pause.recorded().is_empty());
}

#[tokio::test]
async fn test_run_specific_skips_invalid_names_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::standard();
    let adapter = adapter_for(dir.path());
    // Fail every chapter so each book stops after one navigation
    let session = FakeSession::new().failing_on("-1.cfm");

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let progress = orchestrator
        .run_specific(&names(&["genesis", "not-a-real-book", "exodus"]))
        .await;

    assert_eq!(progress.total_units, 2);
    assert_eq!(
        session.navigations(),
        vec![
            "https://commentary.test/guide/genesis/genesis-1.cfm",
            "https://commentary.test/guide/exodus/exodus-1.cfm",
        ]
    );
    assert_eq!(progress.failed_units, vec!["genesis", "exodus"]);
}

#[tokio::test]
async fn test_run_specific_with_no_valid_names() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let progress = orchestrator.run_specific(&names(&["omega", "zeta"])).await;

    assert_eq!(progress.state(), RunState::Completed);
    assert_eq!(progress.total_units, 0);
    assert!(session.navigations().is_empty());
}

#[tokio::test]
async fn test_run_specific_attempts_repeated_name_once() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();
    let pause = RecordingPause::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, pause.clone(), DELAY);
    let progress = orchestrator
        .run_specific(&names(&["Gamma", "gamma"]))
        .await;

    assert_eq!(progress.total_units, 1);
    assert_eq!(session.navigations().len(), 1);
    assert!(pause.recorded().is_empty());
}

#[tokio::test]
async fn test_run_single_whole_book() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let capture = orchestrator.run_single("Beta", None).await.unwrap();

    assert_eq!(capture.unit, "beta");
    assert_eq!(capture.items.len(), 3);
    assert_eq!(
        capture.items.iter().map(|i| i.item).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_run_single_chapter() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::standard();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let capture = orchestrator.run_single("hebrews", Some("3")).await.unwrap();

    assert_eq!(capture.items.len(), 1);
    assert_eq!(
        session.navigations(),
        vec!["https://commentary.test/guide/hebrews/hebrews-3.cfm"]
    );
    assert_eq!(
        capture.items[0].path,
        dir.path().join("hebrews").join("Study Guide- hebrews-3.pdf")
    );
}

#[tokio::test]
async fn test_run_single_rejects_chapter_out_of_range_before_navigation() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::standard();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);

    for raw in ["0", "51", "three"] {
        let err = orchestrator
            .run_single("genesis", Some(raw))
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                ArchiveError::Catalog(CatalogError::InvalidItemIndex { max: 50, .. })
            ),
            "unexpected error for {}: {}",
            raw,
            err
        );
    }

    assert!(session.navigations().is_empty());
    assert_eq!(session.opened(), 0);
}

#[tokio::test]
async fn test_run_single_unknown_book() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::standard();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new();

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let err = orchestrator.run_single("Maccabees", None).await.unwrap_err();

    assert!(matches!(
        err,
        ArchiveError::Catalog(CatalogError::UnknownUnit { ref name }) if name == "maccabees"
    ));
    assert!(session.navigations().is_empty());
}

#[tokio::test]
async fn test_run_single_surfaces_capture_failure() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());
    let session = FakeSession::new().failing_on("alpha-2");

    let orchestrator = Orchestrator::new(&catalog, &adapter, &session, RecordingPause::new(), DELAY);
    let err = orchestrator.run_single("alpha", None).await.unwrap_err();

    assert!(matches!(err, ArchiveError::Capture(_)));
    assert_eq!(session.closed(), 2);
}

#[tokio::test]
async fn test_rerun_resumes_only_missing_books() {
    let dir = TempDir::new().unwrap();
    let catalog = small_catalog();
    let adapter = adapter_for(dir.path());

    // First run: beta fails before anything of it is written
    let first = FakeSession::new().failing_on("beta-1");
    let snapshot = OutputSnapshot::scan(dir.path()).unwrap();
    let targets = pending_units(&catalog, &snapshot);
    assert_eq!(targets, names(&["alpha", "beta", "gamma"]));

    let orchestrator = Orchestrator::new(&catalog, &adapter, &first, RecordingPause::new(), DELAY);
    let progress = orchestrator.run(&targets).await;
    assert_eq!(progress.failed_units, vec!["beta"]);

    // Second run picks up exactly the failed book
    let snapshot = OutputSnapshot::scan(dir.path()).unwrap();
    let targets = pending_units(&catalog, &snapshot);
    assert_eq!(targets, names(&["beta"]));

    let second = FakeSession::new();
    let orchestrator = Orchestrator::new(&catalog, &adapter, &second, RecordingPause::new(), DELAY);
    let progress = orchestrator.run(&targets).await;
    assert_eq!(progress.state(), RunState::Completed);
    assert!(second.navigations().iter().all(|url| url.contains("/beta/")));

    // Third run has nothing left to do
    let snapshot = OutputSnapshot::scan(dir.path()).unwrap();
    assert!(pending_units(&catalog, &snapshot).is_empty());
}
