// src/scan/cache.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::types::HashAlgorithm;

/// Per-project directory holding the fingerprint store (and module state
/// such as the version file and collected tags).
pub const CACHE_DIR: &str = ".janitor";

/// Relative path (from the scan root) to the fingerprint store.
///
/// The effective path on disk is `<root>/.janitor/fingerprints`.
pub const CACHE_FILE_PATH: &str = ".janitor/fingerprints";

fn store_path(root: &Path) -> PathBuf {
    root.join(CACHE_FILE_PATH)
}

/// On-disk shape of the store. Digests are serialized as raw byte arrays so
/// they round-trip exactly; paths are JSON-escaped strings.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCache {
    algorithm_id: u8,
    entries: BTreeMap<String, Vec<u8>>,
}

/// Persistent map from absolute file path to last-known content digest.
///
/// All entries of a loaded cache were produced by the same algorithm; a
/// store written under a different algorithm id is discarded whole rather
/// than partially reused.
#[derive(Debug)]
pub struct FingerprintCache {
    algorithm: HashAlgorithm,
    entries: BTreeMap<PathBuf, Vec<u8>>,
}

impl FingerprintCache {
    /// Fresh cache with no entries.
    pub fn empty(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            entries: BTreeMap::new(),
        }
    }

    /// Load the store under `root`, requesting `algorithm` fingerprints.
    ///
    /// This never fails to the caller:
    /// - missing store: empty cache (first run),
    /// - undecodable store: empty cache, surfaced as a warning,
    /// - algorithm mismatch: empty cache,
    /// - entries whose path no longer exists: dropped.
    pub fn load(fs: &dyn FileSystem, root: &Path, algorithm: HashAlgorithm) -> Self {
        let path = store_path(root);

        if !fs.is_file(&path) {
            debug!(?path, "no fingerprint store found, starting empty");
            return Self::empty(algorithm);
        }

        let raw = match fs.read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(?path, %err, "fingerprint store unreadable, starting empty");
                return Self::empty(algorithm);
            }
        };

        let stored: StoredCache = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(?path, %err, "fingerprint store corrupt, starting empty");
                return Self::empty(algorithm);
            }
        };

        if stored.algorithm_id != algorithm.id() {
            debug!(
                stored = stored.algorithm_id,
                requested = algorithm.id(),
                "fingerprint store was written with a different algorithm, discarding"
            );
            return Self::empty(algorithm);
        }

        let mut entries = BTreeMap::new();
        let mut stale = 0usize;
        for (path_str, digest) in stored.entries {
            let entry_path = PathBuf::from(path_str);
            // The cache never reports a fingerprint for a file that isn't there.
            if fs.is_file(&entry_path) {
                entries.insert(entry_path, digest);
            } else {
                stale += 1;
            }
        }
        if stale > 0 {
            debug!(stale, "dropped stale fingerprint entries on load");
        }

        debug!(entries = entries.len(), "fingerprint store loaded");
        Self { algorithm, entries }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.entries.get(path).map(|d| d.as_slice())
    }

    /// Overwrites unconditionally.
    pub fn set(&mut self, path: PathBuf, digest: Vec<u8>) {
        self.entries.insert(path, digest);
    }

    /// Drop all entries but keep the algorithm; used by rebuild mode to
    /// force every file to count as changed.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the cache under `root`.
    ///
    /// The store is written to a temporary sibling and renamed into place,
    /// so a crash mid-write cannot leave a truncated store that decodes on
    /// the next load.
    pub fn save(&self, fs: &dyn FileSystem, root: &Path) -> Result<()> {
        let path = store_path(root);
        let tmp = path.with_extension("tmp");

        let stored = StoredCache {
            algorithm_id: self.algorithm.id(),
            entries: self
                .entries
                .iter()
                .map(|(p, d)| (p.to_string_lossy().into_owned(), d.clone()))
                .collect(),
        };

        let encoded = serde_json::to_vec(&stored).context("encoding fingerprint store")?;
        fs.write(&tmp, &encoded)
            .with_context(|| format!("writing fingerprint store at {:?}", tmp))?;
        fs.rename(&tmp, &path)
            .with_context(|| format!("replacing fingerprint store at {:?}", path))?;

        debug!(entries = self.entries.len(), ?path, "fingerprint store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn load_of_missing_store_is_empty() {
        let fs = MockFileSystem::new();
        let cache = FingerprintCache::load(&fs, Path::new("/proj"), HashAlgorithm::Blake3);
        assert!(cache.is_empty());
        assert_eq!(cache.algorithm(), HashAlgorithm::Blake3);
    }

    #[test]
    fn load_of_corrupt_store_is_empty() {
        let fs = MockFileSystem::new();
        let root = Path::new("/proj");
        fs.add_file(root.join(CACHE_FILE_PATH), "not json at all");

        let cache = FingerprintCache::load(&fs, root, HashAlgorithm::Blake3);
        assert!(cache.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let fs = MockFileSystem::new();
        let root = Path::new("/proj");
        let file = root.join("src/lib.rs");
        fs.add_file(&file, "content");

        let mut cache = FingerprintCache::empty(HashAlgorithm::Sha256);
        cache.set(file.clone(), vec![1, 2, 3, 255]);
        cache.save(&fs, root).unwrap();

        let reloaded = FingerprintCache::load(&fs, root, HashAlgorithm::Sha256);
        assert_eq!(reloaded.get(&file), Some([1, 2, 3, 255].as_slice()));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn save_leaves_no_temporary_file_behind() {
        let fs = MockFileSystem::new();
        let root = Path::new("/proj");

        let cache = FingerprintCache::empty(HashAlgorithm::Blake3);
        cache.save(&fs, root).unwrap();

        assert!(fs.is_file(&root.join(CACHE_FILE_PATH)));
        assert!(!fs.exists(&root.join(".janitor/fingerprints.tmp")));
    }

    #[test]
    fn algorithm_mismatch_discards_whole_store() {
        let fs = MockFileSystem::new();
        let root = Path::new("/proj");
        let file = root.join("a.txt");
        fs.add_file(&file, "x");

        let mut cache = FingerprintCache::empty(HashAlgorithm::Md5);
        cache.set(file.clone(), vec![9; 16]);
        cache.save(&fs, root).unwrap();

        let reloaded = FingerprintCache::load(&fs, root, HashAlgorithm::Blake3);
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.algorithm(), HashAlgorithm::Blake3);
    }

    #[test]
    fn stale_entries_are_evicted_on_load() {
        let fs = MockFileSystem::new();
        let root = Path::new("/proj");
        let kept = root.join("kept.txt");
        let gone = root.join("gone.txt");
        fs.add_file(&kept, "kept");
        fs.add_file(&gone, "gone");

        let mut cache = FingerprintCache::empty(HashAlgorithm::Blake3);
        cache.set(kept.clone(), vec![1]);
        cache.set(gone.clone(), vec![2]);
        cache.save(&fs, root).unwrap();

        fs.remove(&gone);

        let reloaded = FingerprintCache::load(&fs, root, HashAlgorithm::Blake3);
        assert_eq!(reloaded.get(&kept), Some([1u8].as_slice()));
        assert_eq!(reloaded.get(&gone), None);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn clear_keeps_algorithm() {
        let mut cache = FingerprintCache::empty(HashAlgorithm::Md5);
        cache.set(PathBuf::from("/a"), vec![1]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.algorithm(), HashAlgorithm::Md5);
    }
}
