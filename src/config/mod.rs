// src/config/mod.rs

//! Configuration loading and validation.
//!
//! `Janitor.toml` is deserialized into [`model::RawConfigFile`], validated,
//! and handed to the rest of the application as [`model::ConfigFile`]. The
//! scanner and the modules only ever see already-validated native values.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_or_default, write_sample, CONFIG_FILE_NAME};
pub use model::{
    BlacklistSection, ConfigFile, ModuleOptions, PrefixerConfig, PrefixerSection, RawConfigFile,
    TaggerSection, VersionerSection,
};
