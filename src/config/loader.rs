// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Name of the config file looked up in the working path.
pub const CONFIG_FILE_NAME: &str = "Janitor.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the entry point for an explicitly specified `--config` file: a
/// missing file is an error here, unlike [`load_or_default`].
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, &path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `Janitor.toml` from the working path, falling back to the builtin
/// defaults when the file does not exist.
///
/// A file that exists but fails to parse or validate is still an error; a
/// broken config must not be silently replaced by defaults.
pub fn load_or_default(fs: &dyn FileSystem, dir: &Path) -> Result<ConfigFile> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !fs.is_file(&path) {
        debug!(?path, "no config file found, using builtin defaults");
        return Ok(ConfigFile::builtin_default());
    }
    info!(?path, "using configuration file");
    load_and_validate(fs, &path)
}

/// Helper to resolve the default config path inside a working directory.
pub fn default_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Write a commented sample config (the builtin defaults) to
/// `<dir>/Janitor.toml` and return the written path.
pub fn write_sample(fs: &dyn FileSystem, dir: &Path) -> Result<PathBuf> {
    let path = default_config_path(dir);
    fs.write(&path, SAMPLE_CONFIG.as_bytes())?;
    Ok(path)
}

/// Sample configuration mirroring the builtin defaults.
const SAMPLE_CONFIG: &str = r###"# Janitor configuration.
#
# Every section and key is optional; missing values fall back to the
# defaults shown here.

[blacklist]
# Exclusions applied no matter which module is active.
names = [".gitignore", ".DS_Store"]
folders = [".janitor", ".git", "__pycache__", "target", "node_modules"]
extensions = [
    "a", "o", "os", "so", "dylib", "dll", "exe",
    "pyc", "pyo", "jpg", "jpeg", "png", "gif", "pdf",
]

[tagger]
use = true
exclude_names = []
exclude_folders = []
exclude_extensions = []
# Tag words matched case-insensitively on word boundaries.
words = ["fixme", "todo", "bug", "hack", "note", "xxx"]

[tagger.marks]
"!!!" = "alert"
"???" = "question"

[prefixer]
use = true
exclude_names = []
exclude_folders = []
exclude_extensions = []
tag = "INFO"
align = "center"   # left | center | right
width = 10
block = "##"

[versioner]
use = true
exclude_names = []
exclude_folders = []
exclude_extensions = []
# A *_max of 0 means the sequence never carries over; *_base is the radix
# the sequence is rendered in.
major_max = 0
minor_max = 9
maintenance_max = 9
build_max = 999
major_base = 10
minor_base = 10
maintenance_base = 10
build_base = 10
"###;
