use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tokio::time::sleep;

use janitor_test_utils::builders::descriptor;
use janitor_test_utils::init_tracing;
use janitor_test_utils::recording_module::RecordingModule;

use janitor::fs::RealFileSystem;
use janitor::modules::Module;
use janitor::scan::{
    CancelFlag, ChangeDetector, ExclusionResolver, ExclusionTable, FingerprintCache, Scanner,
    SessionOptions, WatchSession, CACHE_FILE_PATH,
};
use janitor::types::HashAlgorithm;

fn scanner_for(root: &Path, module_name: &str) -> Scanner {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let fs = Arc::new(RealFileSystem);
    let cache = FingerprintCache::load(fs.as_ref(), &root, HashAlgorithm::Blake3);
    Scanner::new(
        fs,
        root,
        ExclusionResolver::new(
            ExclusionTable::default(),
            vec![descriptor(module_name, true, ExclusionTable::default())],
        ),
        ChangeDetector::new(cache),
        HashAlgorithm::Blake3,
    )
}

#[tokio::test]
async fn one_shot_session_runs_a_single_dispatching_pass() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let (module, log) = RecordingModule::new("rec");
    let mut modules: Vec<Box<dyn Module>> = vec![Box::new(module)];

    let session = WatchSession::new(
        scanner_for(dir.path(), "rec"),
        SessionOptions {
            interval: None,
            update_only: false,
        },
        CancelFlag::new(),
    );
    let summary = session.run(&mut modules).await.unwrap();

    assert_eq!(summary.passes, 1);
    assert_eq!(summary.changed_files, 1);
    assert!(!summary.cancelled);

    let log = log.lock().unwrap();
    assert_eq!(log.processed.len(), 1);
    assert!(log.processed[0].ends_with("a.txt"));
    assert_eq!(log.passes_finished, 1);

    // The pass found changes, so the cache was persisted.
    assert!(dir.path().join(CACHE_FILE_PATH).is_file());
}

#[tokio::test]
async fn update_only_pass_persists_the_cache_without_dispatching() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let (module, log) = RecordingModule::new("rec");
    let mut modules: Vec<Box<dyn Module>> = vec![Box::new(module)];

    let session = WatchSession::new(
        scanner_for(dir.path(), "rec"),
        SessionOptions {
            interval: None,
            update_only: true,
        },
        CancelFlag::new(),
    );
    let summary = session.run(&mut modules).await.unwrap();

    assert_eq!(summary.changed_files, 1);
    assert!(log.lock().unwrap().processed.is_empty());
    assert!(dir.path().join(CACHE_FILE_PATH).is_file());
}

/// Scenario D: `update_only` is honoured on the first pass of a repeating
/// session only; later passes dispatch normally without any option changing.
#[tokio::test]
async fn repeating_session_dispatches_after_the_first_update_only_pass() {
    init_tracing();

    let dir = tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "one").unwrap();

    let (module, log) = RecordingModule::new("rec");
    let mut modules: Vec<Box<dyn Module>> = vec![Box::new(module)];

    let cancel = CancelFlag::new();
    let session = WatchSession::new(
        scanner_for(dir.path(), "rec"),
        SessionOptions {
            interval: Some(Duration::from_millis(10)),
            update_only: true,
        },
        cancel.clone(),
    );
    let handle = tokio::spawn(async move { session.run(&mut modules).await });

    // First pass sees the new file but must not dispatch it.
    sleep(Duration::from_millis(100)).await;
    assert!(log.lock().unwrap().processed.is_empty());

    // An edit between passes is dispatched normally.
    fs::write(&file, "two").unwrap();
    sleep(Duration::from_millis(300)).await;

    cancel.cancel();
    let summary = handle.await.unwrap().unwrap();

    assert!(summary.cancelled);
    assert!(summary.passes >= 2);

    let log = log.lock().unwrap();
    assert!(
        log.processed.iter().any(|p| p.ends_with("a.txt")),
        "the edit after the first pass should have been dispatched"
    );
}

#[tokio::test]
async fn cancelled_session_stops_at_a_pass_boundary() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let (module, _log) = RecordingModule::new("rec");
    let mut modules: Vec<Box<dyn Module>> = vec![Box::new(module)];

    let cancel = CancelFlag::new();
    let session = WatchSession::new(
        scanner_for(dir.path(), "rec"),
        SessionOptions {
            interval: Some(Duration::from_secs(3600)),
            update_only: false,
        },
        cancel.clone(),
    );
    let handle = tokio::spawn(async move { session.run(&mut modules).await });

    // Give the first pass time to complete, then interrupt the long sleep.
    sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    let summary = janitor_test_utils::with_timeout(async { handle.await.unwrap().unwrap() }).await;
    assert!(summary.cancelled);
    assert_eq!(summary.passes, 1);
}
