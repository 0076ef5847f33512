// src/scan/detect.rs

use std::path::{Path, PathBuf};

use crate::scan::cache::FingerprintCache;

/// Compares fresh digests against the fingerprint cache.
///
/// Detection and recording are separate steps on purpose: the traversal
/// engine computes a digest once, asks whether it changed, and records it
/// afterwards regardless of the answer.
#[derive(Debug)]
pub struct ChangeDetector {
    cache: FingerprintCache,
}

impl ChangeDetector {
    pub fn new(cache: FingerprintCache) -> Self {
        Self { cache }
    }

    /// True if no fingerprint is cached for `path`, or the cached one
    /// differs byte-for-byte from `digest`.
    pub fn is_changed(&self, path: &Path, digest: &[u8]) -> bool {
        match self.cache.get(path) {
            Some(previous) => previous != digest,
            None => true,
        }
    }

    /// Record the digest of a scanned file, overwriting any previous entry.
    pub fn record_scanned(&mut self, path: PathBuf, digest: Vec<u8>) {
        self.cache.set(path, digest);
    }

    pub fn cache(&self) -> &FingerprintCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut FingerprintCache {
        &mut self.cache
    }
}
