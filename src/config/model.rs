// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::HeaderAlign;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [blacklist]
/// extensions = ["o", "so", "png"]
///
/// [tagger]
/// use = true
/// exclude_folders = ["vendor"]
///
/// [prefixer]
/// width = 10
///
/// [versioner]
/// build_max = 999
/// ```
///
/// All sections are optional and have builtin defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global exclusion rules from `[blacklist]`; applied regardless of
    /// which module is active.
    #[serde(default)]
    pub blacklist: BlacklistSection,

    #[serde(default)]
    pub tagger: TaggerSection,

    #[serde(default)]
    pub prefixer: PrefixerSection,

    #[serde(default)]
    pub versioner: VersionerSection,
}

/// `[blacklist]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BlacklistSection {
    #[serde(default = "default_blacklist_names")]
    pub names: Vec<String>,

    #[serde(default = "default_blacklist_folders")]
    pub folders: Vec<String>,

    #[serde(default = "default_blacklist_extensions")]
    pub extensions: Vec<String>,
}

fn default_blacklist_names() -> Vec<String> {
    strings(&[".gitignore", ".DS_Store"])
}

fn default_blacklist_folders() -> Vec<String> {
    strings(&[".janitor", ".git", "__pycache__", "target", "node_modules"])
}

fn default_blacklist_extensions() -> Vec<String> {
    strings(&[
        "a", "o", "os", "so", "dylib", "dll", "exe", "pyc", "pyo", "jpg", "jpeg", "png", "gif",
        "pdf",
    ])
}

impl Default for BlacklistSection {
    fn default() -> Self {
        Self {
            names: default_blacklist_names(),
            folders: default_blacklist_folders(),
            extensions: default_blacklist_extensions(),
        }
    }
}

/// Options every module section shares: the `use` switch plus the three
/// per-module exclusion lists.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleOptions {
    #[serde(default = "default_true", rename = "use")]
    pub enabled: bool,

    #[serde(default)]
    pub exclude_names: Vec<String>,

    #[serde(default)]
    pub exclude_folders: Vec<String>,

    #[serde(default)]
    pub exclude_extensions: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude_names: Vec::new(),
            exclude_folders: Vec::new(),
            exclude_extensions: Vec::new(),
        }
    }
}

/// `[tagger]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggerSection {
    #[serde(flatten)]
    pub options: ModuleOptions,

    /// Tag words collected from comments, matched case-insensitively on word
    /// boundaries.
    #[serde(default = "default_tagger_words")]
    pub words: Vec<String>,

    /// Literal marks and the label they are reported under.
    #[serde(default = "default_tagger_marks")]
    pub marks: BTreeMap<String, String>,
}

fn default_tagger_words() -> Vec<String> {
    strings(&["fixme", "todo", "bug", "hack", "note", "xxx"])
}

fn default_tagger_marks() -> BTreeMap<String, String> {
    let mut marks = BTreeMap::new();
    marks.insert("!!!".to_string(), "alert".to_string());
    marks.insert("???".to_string(), "question".to_string());
    marks
}

impl Default for TaggerSection {
    fn default() -> Self {
        Self {
            options: ModuleOptions::default(),
            words: default_tagger_words(),
            marks: default_tagger_marks(),
        }
    }
}

/// `[prefixer]` section, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixerSection {
    #[serde(flatten)]
    pub options: ModuleOptions,

    #[serde(default = "default_prefixer_tag")]
    pub tag: String,

    /// `"left"`, `"center"` or `"right"`; validated into [`HeaderAlign`].
    #[serde(default = "default_prefixer_align")]
    pub align: String,

    /// Total width of the rendered header line.
    #[serde(default = "default_prefixer_width")]
    pub width: usize,

    /// Comment leader put on both ends of the header line.
    #[serde(default = "default_prefixer_block")]
    pub block: String,
}

fn default_prefixer_tag() -> String {
    "INFO".to_string()
}

fn default_prefixer_align() -> String {
    "center".to_string()
}

fn default_prefixer_width() -> usize {
    10
}

fn default_prefixer_block() -> String {
    "##".to_string()
}

impl Default for PrefixerSection {
    fn default() -> Self {
        Self {
            options: ModuleOptions::default(),
            tag: default_prefixer_tag(),
            align: default_prefixer_align(),
            width: default_prefixer_width(),
            block: default_prefixer_block(),
        }
    }
}

/// `[versioner]` section.
///
/// A `*_max` of 0 means the sequence is unbounded (no carry out of it); the
/// `*_base` values are the radix each sequence is rendered and parsed in.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionerSection {
    #[serde(flatten)]
    pub options: ModuleOptions,

    #[serde(default = "default_major_max")]
    pub major_max: u64,
    #[serde(default = "default_minor_max")]
    pub minor_max: u64,
    #[serde(default = "default_maintenance_max")]
    pub maintenance_max: u64,
    #[serde(default = "default_build_max")]
    pub build_max: u64,

    #[serde(default = "default_base")]
    pub major_base: u32,
    #[serde(default = "default_base")]
    pub minor_base: u32,
    #[serde(default = "default_base")]
    pub maintenance_base: u32,
    #[serde(default = "default_base")]
    pub build_base: u32,
}

fn default_major_max() -> u64 {
    0
}

fn default_minor_max() -> u64 {
    9
}

fn default_maintenance_max() -> u64 {
    9
}

fn default_build_max() -> u64 {
    999
}

fn default_base() -> u32 {
    10
}

impl Default for VersionerSection {
    fn default() -> Self {
        Self {
            options: ModuleOptions::default(),
            major_max: default_major_max(),
            minor_max: default_minor_max(),
            maintenance_max: default_maintenance_max(),
            build_max: default_build_max(),
            major_base: default_base(),
            minor_base: default_base(),
            maintenance_base: default_base(),
            build_base: default_base(),
        }
    }
}

/// Validated prefixer configuration with a typed alignment.
#[derive(Debug, Clone)]
pub struct PrefixerConfig {
    pub options: ModuleOptions,
    pub tag: String,
    pub align: HeaderAlign,
    pub width: usize,
    pub block: String,
}

/// Validated configuration, produced by `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub blacklist: BlacklistSection,
    pub tagger: TaggerSection,
    pub prefixer: PrefixerConfig,
    pub versioner: VersionerSection,
}

impl ConfigFile {
    /// Construct without validation; used by the validation layer and by
    /// test builders that have already checked their inputs.
    pub fn new_unchecked(
        blacklist: BlacklistSection,
        tagger: TaggerSection,
        prefixer: PrefixerConfig,
        versioner: VersionerSection,
    ) -> Self {
        Self {
            blacklist,
            tagger,
            prefixer,
            versioner,
        }
    }

    /// The builtin default configuration (`--default` mode, and the fallback
    /// when no config file exists at the default location).
    pub fn builtin_default() -> Self {
        ConfigFile::try_from(RawConfigFile::default())
            .unwrap_or_else(|_| unreachable!("builtin defaults always validate"))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
