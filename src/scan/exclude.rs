// src/scan/exclude.rs

use std::collections::HashSet;

use crate::config::ConfigFile;
use crate::modules;

/// One tier of exclusion rules: file names, folders and extensions.
///
/// Membership is case-sensitive exact string match. Extension entries may be
/// written with or without the leading dot; both forms match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionTable {
    pub names: HashSet<String>,
    pub folders: HashSet<String>,
    pub extensions: HashSet<String>,
}

impl ExclusionTable {
    pub fn new<N, F, E>(names: N, folders: F, extensions: E) -> Self
    where
        N: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            names: names.into_iter().collect(),
            folders: folders.into_iter().collect(),
            // Extensions are normalized to the bare (dot-less) form once, so
            // set operations across tables behave regardless of which form
            // the user wrote.
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Folders match either by their path relative to the scan root or by
    /// their bare name, so a folder can be excluded anywhere in the tree.
    pub fn contains_folder(&self, relative_path: &str, name: &str) -> bool {
        self.folders.contains(relative_path) || self.folders.contains(name)
    }

    /// `extension` may be given with or without its leading dot; a file
    /// without an extension compares as the empty string.
    pub fn contains_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension.trim_start_matches('.'))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.folders.is_empty() && self.extensions.is_empty()
    }

    fn intersection(&self, other: &ExclusionTable) -> ExclusionTable {
        ExclusionTable {
            names: self.names.intersection(&other.names).cloned().collect(),
            folders: self.folders.intersection(&other.folders).cloned().collect(),
            extensions: self
                .extensions
                .intersection(&other.extensions)
                .cloned()
                .collect(),
        }
    }

    fn union(&self, other: &ExclusionTable) -> ExclusionTable {
        ExclusionTable {
            names: self.names.union(&other.names).cloned().collect(),
            folders: self.folders.union(&other.folders).cloned().collect(),
            extensions: self.extensions.union(&other.extensions).cloned().collect(),
        }
    }
}

/// A downstream module as the scan engine sees it: a name, an enabled flag
/// and its own exclusion table. What the module does with a file is not the
/// engine's business.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub name: String,
    pub enabled: bool,
    pub exclusion: ExclusionTable,
}

/// Computes prune and per-module skip decisions from the global blacklist
/// and the ordered list of module descriptors.
#[derive(Debug, Clone)]
pub struct ExclusionResolver {
    global: ExclusionTable,
    modules: Vec<ModuleDescriptor>,
}

impl ExclusionResolver {
    pub fn new(global: ExclusionTable, modules: Vec<ModuleDescriptor>) -> Self {
        Self { global, modules }
    }

    pub fn enabled_modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter().filter(|m| m.enabled)
    }

    /// The "everywhere" exclusion set used to prune the walk.
    ///
    /// An item is safe to skip entirely only when no enabled module needs to
    /// see it: it is globally blacklisted, or every enabled module excludes
    /// it too. Per dimension that is
    /// `global ∪ (intersection over enabled modules)`, so the prune set
    /// shrinks towards the global table as modules are added, and a module
    /// with an empty table keeps the walk visiting everything the global
    /// table allows.
    pub fn prune_set(&self) -> ExclusionTable {
        let mut enabled = self.enabled_modules();

        let shared = match enabled.next() {
            Some(first) => {
                let mut shared = first.exclusion.clone();
                for module in enabled {
                    shared = shared.intersection(&module.exclusion);
                }
                shared
            }
            // No enabled module wants anything, so nothing beyond the
            // global blacklist is prunable.
            None => ExclusionTable::default(),
        };

        self.global.union(&shared)
    }

    /// Per-module skip decision for a file that survived global pruning.
    ///
    /// Returns false when the file's name, its folder (relative path or bare
    /// name) or its extension appears in that module's own table.
    pub fn should_process(
        &self,
        module: &str,
        file_name: &str,
        folder_relative: &str,
        folder_name: &str,
        extension: &str,
    ) -> bool {
        let Some(descriptor) = self.modules.iter().find(|m| m.name == module) else {
            return false;
        };
        if !descriptor.enabled {
            return false;
        }
        let table = &descriptor.exclusion;
        !(table.contains_name(file_name)
            || table.contains_folder(folder_relative, folder_name)
            || table.contains_extension(extension))
    }
}

/// Build the global exclusion table from the `[blacklist]` section.
pub fn global_table_from_config(cfg: &ConfigFile) -> ExclusionTable {
    ExclusionTable::new(
        cfg.blacklist.names.iter().cloned(),
        cfg.blacklist.folders.iter().cloned(),
        cfg.blacklist.extensions.iter().cloned(),
    )
}

/// Derive the ordered module descriptors from the config, honouring both the
/// per-section `use` flags and any modules excluded for this run.
pub fn descriptors_from_config(cfg: &ConfigFile, disabled: &HashSet<String>) -> Vec<ModuleDescriptor> {
    let sections = [
        (modules::tagger::NAME, &cfg.tagger.options),
        (modules::prefixer::NAME, &cfg.prefixer.options),
        (modules::versioner::NAME, &cfg.versioner.options),
    ];

    sections
        .into_iter()
        .map(|(name, options)| ModuleDescriptor {
            name: name.to_string(),
            enabled: options.enabled && !disabled.contains(name),
            exclusion: ExclusionTable::new(
                options.exclude_names.iter().cloned(),
                options.exclude_folders.iter().cloned(),
                options.exclude_extensions.iter().cloned(),
            ),
        })
        .collect()
}
