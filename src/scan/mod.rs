// src/scan/mod.rs

//! Change detection and traversal.
//!
//! This module is responsible for:
//! - Streaming file fingerprints (`hash`).
//! - The persistent fingerprint cache (`cache`) and the change detector
//!   built on it (`detect`).
//! - Multi-tier exclusion rules: the global blacklist, per-module tables and
//!   the prune set derived from them (`exclude`).
//! - Walking the directory tree and producing one [`ScanPass`] per walk
//!   (`walker`).
//! - Running passes once or on an interval until cancelled (`session`).
//!
//! It does **not** know what the downstream modules do with a changed file;
//! it only decides which files they get to see.

pub mod cache;
pub mod detect;
pub mod exclude;
pub mod hash;
pub mod session;
pub mod walker;

pub use cache::{FingerprintCache, CACHE_DIR, CACHE_FILE_PATH};
pub use detect::ChangeDetector;
pub use exclude::{
    descriptors_from_config, global_table_from_config, ExclusionResolver, ExclusionTable,
    ModuleDescriptor,
};
pub use hash::digest_file;
pub use session::{CancelFlag, SessionOptions, SessionSummary, WatchSession};
pub use walker::{ChangedFile, ScanPass, Scanner};
