// src/modules/tagger.rs

//! Collects tagged comments (`todo`, `fixme`, ...) and marks (`!!!`, `???`)
//! from changed files into `<cache_dir>/tags`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::config::TaggerSection;
use crate::fs::FileSystem;
use crate::modules::Module;

pub const NAME: &str = "tagger";

/// File the collected tags are written to, inside the cache directory.
pub const TAGS_FILE_NAME: &str = "tags";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagHit {
    line: usize,
    label: String,
    text: String,
}

pub struct Tagger {
    fs: Arc<dyn FileSystem>,
    out_path: PathBuf,
    words: Regex,
    marks: Vec<(String, String)>,
    hits: BTreeMap<PathBuf, Vec<TagHit>>,
    dirty: bool,
}

impl Tagger {
    pub fn new(fs: Arc<dyn FileSystem>, cache_dir: &Path, section: &TaggerSection) -> Result<Self> {
        let alternatives: Vec<String> = section.words.iter().map(|w| regex::escape(w)).collect();
        let pattern = format!(r"(?i)\b({})\b[:\s]*(.*)", alternatives.join("|"));
        let words = Regex::new(&pattern).context("building tag word pattern")?;

        Ok(Self {
            fs,
            out_path: cache_dir.join(TAGS_FILE_NAME),
            words,
            marks: section
                .marks
                .iter()
                .map(|(mark, label)| (mark.clone(), label.clone()))
                .collect(),
            hits: BTreeMap::new(),
            dirty: false,
        })
    }

    fn collect_hits(&self, content: &str) -> Vec<TagHit> {
        let mut found = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let number = index + 1;

            if let Some(captures) = self.words.captures(line) {
                found.push(TagHit {
                    line: number,
                    label: captures[1].to_lowercase(),
                    text: captures[2].trim().to_string(),
                });
            }

            for (mark, label) in &self.marks {
                if line.contains(mark.as_str()) {
                    found.push(TagHit {
                        line: number,
                        label: label.clone(),
                        text: line.trim().to_string(),
                    });
                }
            }
        }
        found
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (path, hits) in &self.hits {
            let _ = writeln!(out, "{}", path.display());
            for hit in hits {
                let _ = writeln!(out, "    {}: {}: {}", hit.line, hit.label, hit.text);
            }
            out.push('\n');
        }
        out
    }
}

impl Module for Tagger {
    fn name(&self) -> &str {
        NAME
    }

    fn process(&mut self, path: &Path) -> Result<()> {
        let content = match self.fs.read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                // Binary or unreadable content carries no tags.
                debug!(?path, %err, "tagger skipping unreadable file");
                return Ok(());
            }
        };

        let found = self.collect_hits(&content);
        if found.is_empty() {
            if self.hits.remove(path).is_some() {
                self.dirty = true;
            }
        } else {
            self.hits.insert(path.to_path_buf(), found);
            self.dirty = true;
        }
        Ok(())
    }

    fn finish_pass(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.fs
            .write(&self.out_path, self.render().as_bytes())
            .with_context(|| format!("writing collected tags to {:?}", self.out_path))?;
        self.dirty = false;
        debug!(files = self.hits.len(), "collected tags written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn tagger(fs: &MockFileSystem) -> Tagger {
        Tagger::new(
            Arc::new(fs.clone()),
            Path::new("/proj/.janitor"),
            &TaggerSection::default(),
        )
        .unwrap()
    }

    #[test]
    fn collects_words_and_marks_with_line_numbers() {
        let fs = MockFileSystem::new();
        let src = "/proj/src/lib.rs";
        fs.add_file(
            src,
            "fn a() {}\n// TODO: clean this up\nlet x = 1; // !!! dangerous\n",
        );

        let mut tagger = tagger(&fs);
        tagger.process(Path::new(src)).unwrap();
        tagger.finish_pass().unwrap();

        let tags = fs.read_to_string(Path::new("/proj/.janitor/tags")).unwrap();
        assert!(tags.contains("/proj/src/lib.rs"));
        assert!(tags.contains("2: todo: clean this up"));
        assert!(tags.contains("3: alert: let x = 1; // !!! dangerous"));
    }

    #[test]
    fn file_without_tags_clears_its_earlier_entry() {
        let fs = MockFileSystem::new();
        let src = "/proj/a.rs";
        fs.add_file(src, "// FIXME: broken\n");

        let mut tagger = tagger(&fs);
        tagger.process(Path::new(src)).unwrap();
        tagger.finish_pass().unwrap();
        assert!(fs
            .read_to_string(Path::new("/proj/.janitor/tags"))
            .unwrap()
            .contains("fixme"));

        fs.add_file(src, "// all fixed now\n");
        tagger.process(Path::new(src)).unwrap();
        tagger.finish_pass().unwrap();
        assert!(!fs
            .read_to_string(Path::new("/proj/.janitor/tags"))
            .unwrap()
            .contains("fixme"));
    }

    #[test]
    fn unreadable_file_is_not_an_error() {
        let fs = MockFileSystem::new();
        let mut tagger = tagger(&fs);
        assert!(tagger.process(Path::new("/gone.rs")).is_ok());
    }
}
