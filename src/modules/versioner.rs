// src/modules/versioner.rs

//! Maintains the project's `major.minor.maintenance.build` sequences in
//! `<cache_dir>/version`, bumping the build sequence once per pass that saw
//! changes. Overflowing a bounded sequence carries into the next one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::VersionerSection;
use crate::fs::FileSystem;
use crate::modules::Module;

pub const NAME: &str = "versioner";

/// File the current version is stored in, inside the cache directory.
pub const VERSION_FILE_NAME: &str = "version";

/// One of the four version sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    Major,
    Minor,
    Maintenance,
    Build,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Version {
    major: u64,
    minor: u64,
    maintenance: u64,
    build: u64,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            major: 1,
            minor: 0,
            maintenance: 0,
            build: 0,
        }
    }
}

pub struct Versioner {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    limits: VersionerSection,
    version: Version,
    saw_changes: bool,
}

impl Versioner {
    /// Load the version file leniently: a missing or unparsable file starts
    /// the sequences over rather than failing the run.
    pub fn new(fs: Arc<dyn FileSystem>, cache_dir: &Path, limits: &VersionerSection) -> Self {
        let path = cache_dir.join(VERSION_FILE_NAME);
        let version = match fs.read_to_string(&path) {
            Ok(raw) => match parse_version(&raw, limits) {
                Some(version) => version,
                None => {
                    warn!(?path, "version file unparsable, starting over");
                    Version::default()
                }
            },
            Err(_) => {
                debug!(?path, "no version file yet");
                Version::default()
            }
        };

        Self {
            fs,
            path,
            limits: limits.clone(),
            version,
            saw_changes: false,
        }
    }

    /// Rendered version, e.g. `1.0.0.042 (20260806)`.
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}.{} ({})",
            render_seq(self.version.major, self.limits.major_max, self.limits.major_base),
            render_seq(self.version.minor, self.limits.minor_max, self.limits.minor_base),
            render_seq(
                self.version.maintenance,
                self.limits.maintenance_max,
                self.limits.maintenance_base
            ),
            render_seq(self.version.build, self.limits.build_max, self.limits.build_base),
            Local::now().format("%Y%m%d"),
        )
    }

    /// Bump one sequence; overflowing a bounded sequence resets it and
    /// carries into the next more significant one. The major sequence wraps
    /// without carrying further.
    pub fn increase(&mut self, sequence: Sequence) {
        match sequence {
            Sequence::Build => {
                self.version.build += 1;
                if overflows(self.version.build, self.limits.build_max) {
                    self.version.build = 0;
                    self.increase(Sequence::Maintenance);
                }
            }
            Sequence::Maintenance => {
                self.version.maintenance += 1;
                if overflows(self.version.maintenance, self.limits.maintenance_max) {
                    self.version.maintenance = 0;
                    self.increase(Sequence::Minor);
                }
            }
            Sequence::Minor => {
                self.version.minor += 1;
                if overflows(self.version.minor, self.limits.minor_max) {
                    self.version.minor = 0;
                    self.increase(Sequence::Major);
                }
            }
            Sequence::Major => {
                self.version.major += 1;
                if overflows(self.version.major, self.limits.major_max) {
                    self.version.major = 0;
                }
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.fs
            .write(&self.path, self.version_string().as_bytes())
            .with_context(|| format!("writing version file at {:?}", self.path))
    }
}

fn overflows(value: u64, max: u64) -> bool {
    max > 0 && value > max
}

/// Digits needed to render `max` in `base`; 0 means "no padding".
fn pad_width(max: u64, base: u32) -> usize {
    if max == 0 {
        return 0;
    }
    let mut digits = 0;
    let mut value = max;
    while value > 0 {
        value /= base as u64;
        digits += 1;
    }
    digits
}

fn render_seq(value: u64, max: u64, base: u32) -> String {
    let rendered = to_radix(value, base);
    let width = pad_width(max, base);
    format!("{rendered:0>width$}")
}

fn to_radix(mut value: u64, base: u32) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % base as u64) as usize]);
        value /= base as u64;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Parse `M.m.t.b` from the first whitespace-separated token, in the
/// configured radixes. The trailing date stamp is ignored.
fn parse_version(raw: &str, limits: &VersionerSection) -> Option<Version> {
    let token = raw.split_whitespace().next()?;
    let mut parts = token.split('.');

    let major = u64::from_str_radix(parts.next()?, limits.major_base).ok()?;
    let minor = u64::from_str_radix(parts.next()?, limits.minor_base).ok()?;
    let maintenance = u64::from_str_radix(parts.next()?, limits.maintenance_base).ok()?;
    let build = u64::from_str_radix(parts.next()?, limits.build_base).ok()?;

    Some(Version {
        major,
        minor,
        maintenance,
        build,
    })
}

impl Module for Versioner {
    fn name(&self) -> &str {
        NAME
    }

    fn process(&mut self, _path: &Path) -> Result<()> {
        // The versioner does not care which files changed, only that the
        // pass saw any change at all.
        self.saw_changes = true;
        Ok(())
    }

    fn finish_pass(&mut self) -> Result<()> {
        if !self.saw_changes {
            return Ok(());
        }
        self.saw_changes = false;
        self.increase(Sequence::Build);
        self.save()?;
        info!(version = %self.version_string(), "version bumped");
        Ok(())
    }
}
