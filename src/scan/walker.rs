// src/scan/walker.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::scan::detect::ChangeDetector;
use crate::scan::exclude::{ExclusionResolver, ExclusionTable};
use crate::scan::hash::digest_file;
use crate::types::HashAlgorithm;

/// A changed file together with the enabled modules that should process it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: PathBuf,
    pub modules: Vec<String>,
}

/// Result of one full walk of the tree.
///
/// The pass owns no persistence: saving the cache after a pass that found
/// changes is the watch session's job.
#[derive(Debug)]
pub struct ScanPass {
    pub changed: Vec<ChangedFile>,
    /// Directories the walk refused to descend into; diagnostic only.
    pub pruned_dirs: Vec<PathBuf>,
    /// Controls verbosity only, never behaviour.
    pub first_pass: bool,
}

impl ScanPass {
    fn new(first_pass: bool) -> Self {
        Self {
            changed: Vec::new(),
            pruned_dirs: Vec::new(),
            first_pass,
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Walks the tree once per pass, pruning excluded subtrees, hashing the
/// survivors and collecting changed files with their module assignments.
#[derive(Debug)]
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    resolver: ExclusionResolver,
    detector: ChangeDetector,
    algorithm: HashAlgorithm,
}

impl Scanner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        resolver: ExclusionResolver,
        detector: ChangeDetector,
        algorithm: HashAlgorithm,
    ) -> Self {
        let root = root.into();
        // Canonicalize once so cache keys are stable across invocations.
        let root = fs.canonicalize(&root).unwrap_or_else(|_| root.clone());
        Self {
            fs,
            root,
            resolver,
            detector,
            algorithm,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut ChangeDetector {
        &mut self.detector
    }

    /// Persist the fingerprint cache under the scan root.
    pub fn save_cache(&self) -> anyhow::Result<()> {
        self.detector.cache().save(self.fs.as_ref(), &self.root)
    }

    /// Run one full pass over the tree.
    ///
    /// Per-entry IO failures are logged and skipped; a pass itself never
    /// fails. Directory entries are visited in sorted order, so the produced
    /// `changed` list is deterministic for a given tree.
    pub fn run_pass(&mut self, first_pass: bool) -> ScanPass {
        let prune = self.resolver.prune_set();
        let mut pass = ScanPass::new(first_pass);

        if first_pass {
            info!(root = ?self.root, "scanning all files");
        } else {
            debug!(root = ?self.root, "re-scanning");
        }

        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let mut entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(?dir, %err, "cannot list directory, skipping");
                    continue;
                }
            };
            entries.sort();

            // Subdirectories are pushed in reverse so the stack pops them in
            // sorted order.
            let mut subdirs = Vec::new();

            for path in entries {
                if self.fs.is_dir(&path) {
                    let name = file_name_of(&path);
                    let relative = self.relative_of(&path);
                    if prune.contains_folder(&relative, &name) {
                        debug!(?path, "pruned folder");
                        pass.pruned_dirs.push(path);
                    } else {
                        subdirs.push(path);
                    }
                } else if self.fs.is_file(&path) {
                    self.scan_file(path, &prune, &mut pass);
                } else {
                    // Dangling symlinks and other oddities.
                    debug!(?path, "skipping special entry");
                }
            }

            for sub in subdirs.into_iter().rev() {
                stack.push(sub);
            }
        }

        debug!(
            changed = pass.changed.len(),
            pruned = pass.pruned_dirs.len(),
            "pass finished"
        );
        pass
    }

    fn scan_file(&mut self, path: PathBuf, prune: &ExclusionTable, pass: &mut ScanPass) {
        let file_name = file_name_of(&path);
        let extension = extension_of(&path);

        if prune.contains_name(&file_name) || prune.contains_extension(&extension) {
            debug!(?path, "pruned file");
            return;
        }

        let digest = match digest_file(self.fs.as_ref(), &path, self.algorithm) {
            Ok(digest) => digest,
            Err(err) => {
                // Treated as effectively removed: not cached, not reported,
                // retried on the next pass.
                warn!(?path, %err, "unreadable file skipped for this pass");
                return;
            }
        };

        if self.detector.is_changed(&path, &digest) {
            let (folder_relative, folder_name) = self.parent_of(&path);
            let modules: Vec<String> = self
                .resolver
                .enabled_modules()
                .filter(|m| {
                    self.resolver.should_process(
                        &m.name,
                        &file_name,
                        &folder_relative,
                        &folder_name,
                        &extension,
                    )
                })
                .map(|m| m.name.clone())
                .collect();

            debug!(?path, ?modules, "changed");
            pass.changed.push(ChangedFile {
                path: path.clone(),
                modules,
            });
        }

        // The cache must reflect the latest digest once a file was scanned,
        // whether or not this pass dispatches it anywhere.
        self.detector.record_scanned(path, digest);
    }

    fn relative_of(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => path.to_string_lossy().replace('\\', "/"),
        }
    }

    /// Relative path and bare name of a file's containing folder; both empty
    /// for files directly under the scan root.
    fn parent_of(&self, path: &Path) -> (String, String) {
        match path.parent() {
            Some(parent) if parent != self.root => {
                (self.relative_of(parent), file_name_of(parent))
            }
            _ => (String::new(), String::new()),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension without the leading dot; empty string when there is none.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}
