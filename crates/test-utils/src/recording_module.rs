use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use janitor::modules::Module;

/// A module that only records what it was asked to process, for asserting
/// on dispatch behaviour without touching any files.
pub struct RecordingModule {
    name: String,
    log: Arc<Mutex<RecordingLog>>,
}

#[derive(Debug, Default)]
pub struct RecordingLog {
    pub processed: Vec<PathBuf>,
    pub passes_finished: usize,
}

impl RecordingModule {
    pub fn new(name: &str) -> (Self, Arc<Mutex<RecordingLog>>) {
        let log = Arc::new(Mutex::new(RecordingLog::default()));
        (
            Self {
                name: name.to_string(),
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl Module for RecordingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, path: &Path) -> Result<()> {
        self.log.lock().unwrap().processed.push(path.to_path_buf());
        Ok(())
    }

    fn finish_pass(&mut self) -> Result<()> {
        self.log.lock().unwrap().passes_finished += 1;
        Ok(())
    }
}
