// src/modules/prefixer.rs

//! Keeps a rendered header line at the top of changed files.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::PrefixerConfig;
use crate::fs::FileSystem;
use crate::modules::Module;
use crate::types::HeaderAlign;

pub const NAME: &str = "prefixer";

pub struct Prefixer {
    fs: Arc<dyn FileSystem>,
    header: String,
    block: String,
    core: String,
}

impl Prefixer {
    pub fn new(fs: Arc<dyn FileSystem>, cfg: &PrefixerConfig) -> Self {
        let header = render_header(cfg);
        Self {
            fs,
            header,
            block: cfg.block.clone(),
            core: format!(" {} ", cfg.tag),
        }
    }

    /// A line written by an earlier run, possibly under a different width or
    /// alignment, that should be replaced rather than stacked upon.
    fn is_previous_header(&self, line: &str) -> bool {
        line.starts_with(&self.block) && line.ends_with(&self.block) && line.contains(&self.core)
    }
}

/// Render the header: the tag padded to `width` between two block markers.
fn render_header(cfg: &PrefixerConfig) -> String {
    let inner_width = cfg.width - 2 * cfg.block.chars().count();
    let core = format!(" {} ", cfg.tag);
    let padding = inner_width.saturating_sub(core.chars().count());

    let (left, right) = match cfg.align {
        HeaderAlign::Left => (0, padding),
        HeaderAlign::Right => (padding, 0),
        HeaderAlign::Center => (padding / 2, padding - padding / 2),
    };

    format!(
        "{block}{}{core}{}{block}",
        " ".repeat(left),
        " ".repeat(right),
        block = cfg.block,
        core = core,
    )
}

impl Module for Prefixer {
    fn name(&self) -> &str {
        NAME
    }

    fn process(&mut self, path: &Path) -> Result<()> {
        let content = match self.fs.read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(?path, %err, "prefixer skipping unreadable file");
                return Ok(());
            }
        };

        let first_line = content.lines().next().unwrap_or("");
        let updated = if first_line == self.header {
            return Ok(());
        } else if self.is_previous_header(first_line) {
            let rest = content
                .split_once('\n')
                .map(|(_, rest)| rest)
                .unwrap_or("");
            format!("{}\n{}", self.header, rest)
        } else {
            format!("{}\n{}", self.header, content)
        };

        self.fs
            .write(path, updated.as_bytes())
            .with_context(|| format!("prefixing {:?}", path))?;
        debug!(?path, "header refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, RawConfigFile};
    use crate::fs::mock::MockFileSystem;

    fn default_prefixer(fs: &MockFileSystem) -> Prefixer {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        Prefixer::new(Arc::new(fs.clone()), &cfg.prefixer)
    }

    #[test]
    fn default_header_renders_the_classic_block() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(render_header(&cfg.prefixer), "## INFO ##");
    }

    #[test]
    fn alignment_moves_the_tag_within_the_line() {
        let mut raw = RawConfigFile::default();
        raw.prefixer.width = 16;
        raw.prefixer.align = "left".to_string();
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(render_header(&cfg.prefixer), "## INFO       ##");

        let mut raw = RawConfigFile::default();
        raw.prefixer.width = 16;
        raw.prefixer.align = "right".to_string();
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(render_header(&cfg.prefixer), "##       INFO ##");
    }

    #[test]
    fn header_is_prepended_once_and_stays_idempotent() {
        let fs = MockFileSystem::new();
        let path = Path::new("/proj/a.rs");
        fs.add_file(path, "fn main() {}\n");

        let mut prefixer = default_prefixer(&fs);
        prefixer.process(path).unwrap();
        let once = fs.read_to_string(path).unwrap();
        assert_eq!(once, "## INFO ##\nfn main() {}\n");

        prefixer.process(path).unwrap();
        assert_eq!(fs.read_to_string(path).unwrap(), once);
    }

    #[test]
    fn stale_header_is_replaced_not_stacked() {
        let fs = MockFileSystem::new();
        let path = Path::new("/proj/a.rs");
        fs.add_file(path, "##   INFO   ##\nfn main() {}\n");

        let mut prefixer = default_prefixer(&fs);
        prefixer.process(path).unwrap();
        assert_eq!(fs.read_to_string(path).unwrap(), "## INFO ##\nfn main() {}\n");
    }

    #[test]
    fn unreadable_file_is_not_an_error() {
        let fs = MockFileSystem::new();
        let mut prefixer = default_prefixer(&fs);
        assert!(prefixer.process(Path::new("/gone.rs")).is_ok());
    }
}
