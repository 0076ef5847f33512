use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::tempdir;

use janitor_test_utils::builders::{descriptor, ExclusionTableBuilder};
use janitor_test_utils::init_tracing;

use janitor::fs::RealFileSystem;
use janitor::scan::{
    ChangeDetector, ExclusionResolver, ExclusionTable, FingerprintCache, Scanner,
};
use janitor::types::HashAlgorithm;

fn scanner_for(root: &Path, resolver: ExclusionResolver) -> Scanner {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let fs = Arc::new(RealFileSystem);
    let cache = FingerprintCache::load(fs.as_ref(), &root, HashAlgorithm::Blake3);
    Scanner::new(
        fs,
        root,
        resolver,
        ChangeDetector::new(cache),
        HashAlgorithm::Blake3,
    )
}

fn everything_resolver() -> ExclusionResolver {
    ExclusionResolver::new(
        ExclusionTable::default(),
        vec![descriptor("m", true, ExclusionTable::default())],
    )
}

fn changed_names(scanner: &mut Scanner, first: bool) -> Vec<String> {
    scanner
        .run_pass(first)
        .changed
        .iter()
        .map(|c| {
            c.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect()
}

/// Scenario A: a globally excluded extension is neither reported nor hashed.
#[test]
fn globally_excluded_extension_is_skipped_entirely() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "text").unwrap();
    fs::write(dir.path().join("b.o"), "object code").unwrap();

    let resolver = ExclusionResolver::new(
        ExclusionTableBuilder::new().extension("o").build(),
        vec![descriptor("m", true, ExclusionTable::default())],
    );
    let mut scanner = scanner_for(dir.path(), resolver);

    assert_eq!(changed_names(&mut scanner, true), vec!["a.txt"]);

    // The excluded file never made it into the cache either: it was pruned
    // before hashing, not just filtered from the report.
    scanner.save_cache().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let cache = FingerprintCache::load(&RealFileSystem, &root, HashAlgorithm::Blake3);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&root.join("b.o")).is_none());
}

/// Scenario B: a content edit is reported and the cache ends up holding the
/// new digest.
#[test]
fn content_change_is_reported_once() {
    init_tracing();

    let dir = tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "first").unwrap();

    let mut scanner = scanner_for(dir.path(), everything_resolver());
    assert_eq!(changed_names(&mut scanner, true), vec!["a.txt"]);

    fs::write(&file, "second").unwrap();
    assert_eq!(changed_names(&mut scanner, false), vec!["a.txt"]);

    // The new digest was recorded, so the next pass is quiet.
    assert!(changed_names(&mut scanner, false).is_empty());
}

/// Scenario C: rebuild clears the cache first, so even identical content is
/// reported as changed.
#[test]
fn rebuild_reports_unchanged_files_as_changed() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "stable content").unwrap();

    let mut scanner = scanner_for(dir.path(), everything_resolver());
    assert_eq!(changed_names(&mut scanner, true), vec!["a.txt"]);
    scanner.save_cache().unwrap();

    // New run in rebuild mode: cache loaded, then dropped.
    let mut scanner = scanner_for(dir.path(), everything_resolver());
    scanner.detector_mut().cache_mut().clear();
    assert_eq!(changed_names(&mut scanner, true), vec!["a.txt"]);
}

/// Idempotence: two passes with no edits in between, across a save/load
/// boundary, report nothing the second time.
#[test]
fn rescan_without_edits_is_quiet() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::create_dir_all(dir.path().join("nested/deep")).unwrap();
    fs::write(dir.path().join("nested/deep/b.txt"), "b").unwrap();

    let mut scanner = scanner_for(dir.path(), everything_resolver());
    assert_eq!(scanner.run_pass(true).changed.len(), 2);
    scanner.save_cache().unwrap();

    let mut scanner = scanner_for(dir.path(), everything_resolver());
    assert!(!scanner.run_pass(true).has_changes());
}

#[test]
fn pruned_folders_are_recorded_as_diagnostics() {
    init_tracing();

    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("build")).unwrap();
    fs::write(dir.path().join("build/junk.txt"), "junk").unwrap();
    fs::write(dir.path().join("main.txt"), "main").unwrap();

    let resolver = ExclusionResolver::new(
        ExclusionTableBuilder::new().folder("build").build(),
        vec![descriptor("m", true, ExclusionTable::default())],
    );
    let mut scanner = scanner_for(dir.path(), resolver);

    let pass = scanner.run_pass(true);
    let pruned: Vec<PathBuf> = pass.pruned_dirs.clone();
    assert_eq!(pruned.len(), 1);
    assert!(pruned[0].ends_with("build"));
    assert_eq!(pass.changed.len(), 1);
}
