// src/modules/mod.rs

//! Downstream processing modules.
//!
//! The scan engine only hands these a stream of changed-file paths; each
//! module decides what to do with a file. New modules plug in by
//! implementing [`Module`] and registering a descriptor for the resolver.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::config::ConfigFile;
use crate::fs::FileSystem;

pub mod prefixer;
pub mod tagger;
pub mod versioner;

pub use prefixer::Prefixer;
pub use tagger::Tagger;
pub use versioner::{Sequence, Versioner};

/// A content-processing module fed by the watch session.
pub trait Module: Send {
    fn name(&self) -> &str;

    /// Called once per changed file assigned to this module.
    fn process(&mut self, path: &Path) -> Result<()>;

    /// Called once at the end of every dispatching pass, after all changed
    /// files were processed.
    fn finish_pass(&mut self) -> Result<()> {
        Ok(())
    }
}

/// All known module names, in dispatch order.
pub fn known_names() -> [&'static str; 3] {
    [tagger::NAME, prefixer::NAME, versioner::NAME]
}

/// Instantiate the enabled modules in dispatch order.
///
/// `disabled` holds module names excluded for this run on top of the
/// per-section `use` flags.
pub fn build_modules(
    cfg: &ConfigFile,
    fs: Arc<dyn FileSystem>,
    cache_dir: &Path,
    disabled: &HashSet<String>,
) -> Result<Vec<Box<dyn Module>>> {
    let mut modules: Vec<Box<dyn Module>> = Vec::new();

    if cfg.tagger.options.enabled && !disabled.contains(tagger::NAME) {
        modules.push(Box::new(Tagger::new(fs.clone(), cache_dir, &cfg.tagger)?));
    }
    if cfg.prefixer.options.enabled && !disabled.contains(prefixer::NAME) {
        modules.push(Box::new(Prefixer::new(fs.clone(), &cfg.prefixer)));
    }
    if cfg.versioner.options.enabled && !disabled.contains(versioner::NAME) {
        modules.push(Box::new(Versioner::new(fs, cache_dir, &cfg.versioner)));
    }

    Ok(modules)
}
