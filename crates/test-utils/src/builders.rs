#![allow(dead_code)]

use janitor::config::{ConfigFile, RawConfigFile};
use janitor::scan::{ExclusionTable, ModuleDescriptor};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Empty the global blacklist so tests control exclusions explicitly.
    pub fn without_blacklist(mut self) -> Self {
        self.config.blacklist.names.clear();
        self.config.blacklist.folders.clear();
        self.config.blacklist.extensions.clear();
        self
    }

    pub fn with_blacklist_name(mut self, name: &str) -> Self {
        self.config.blacklist.names.push(name.to_string());
        self
    }

    pub fn with_blacklist_folder(mut self, folder: &str) -> Self {
        self.config.blacklist.folders.push(folder.to_string());
        self
    }

    pub fn with_blacklist_extension(mut self, ext: &str) -> Self {
        self.config.blacklist.extensions.push(ext.to_string());
        self
    }

    pub fn tagger_enabled(mut self, enabled: bool) -> Self {
        self.config.tagger.options.enabled = enabled;
        self
    }

    pub fn prefixer_enabled(mut self, enabled: bool) -> Self {
        self.config.prefixer.options.enabled = enabled;
        self
    }

    pub fn versioner_enabled(mut self, enabled: bool) -> Self {
        self.config.versioner.options.enabled = enabled;
        self
    }

    pub fn with_tagger_exclude_extension(mut self, ext: &str) -> Self {
        self.config.tagger.options.exclude_extensions.push(ext.to_string());
        self
    }

    pub fn with_prefixer_exclude_folder(mut self, folder: &str) -> Self {
        self.config.prefixer.options.exclude_folders.push(folder.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ExclusionTable`.
pub struct ExclusionTableBuilder {
    names: Vec<String>,
    folders: Vec<String>,
    extensions: Vec<String>,
}

impl ExclusionTableBuilder {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            folders: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn folder(mut self, folder: &str) -> Self {
        self.folders.push(folder.to_string());
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.extensions.push(ext.to_string());
        self
    }

    pub fn build(self) -> ExclusionTable {
        ExclusionTable::new(self.names, self.folders, self.extensions)
    }
}

impl Default for ExclusionTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a module descriptor with an explicit table.
pub fn descriptor(name: &str, enabled: bool, exclusion: ExclusionTable) -> ModuleDescriptor {
    ModuleDescriptor {
        name: name.to_string(),
        enabled,
        exclusion,
    }
}
