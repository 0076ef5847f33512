// src/scan/session.rs

//! The watch scheduler.
//!
//! A session runs the scanner either once or repeatedly on a fixed interval.
//! The pass itself is synchronous; the interval sleep is the only suspension
//! point, and cancellation is observed at pass boundaries only, so the cache
//! is never persisted with a half-scanned tree.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::modules::Module;
use crate::scan::walker::{ScanPass, Scanner};

/// Cooperative cancellation flag shared between the Ctrl-C handler and the
/// running session.
#[derive(Debug, Clone)]
pub struct CancelFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelFlag {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`CancelFlag::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // Ignore a closed channel; it can only close if the flag is dropped,
        // and we hold a reference to it.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// How a session behaves across passes.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// `None` runs a single pass; `Some(interval)` re-scans until cancelled.
    pub interval: Option<Duration>,

    /// Suppress module dispatch. In a repeating session this is honoured on
    /// the first pass only; every later pass dispatches normally.
    pub update_only: bool,
}

/// What a finished session did, for operator-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub passes: u32,
    pub changed_files: usize,
    pub cancelled: bool,
}

/// Runs scan passes and feeds changed files to the modules.
pub struct WatchSession {
    scanner: Scanner,
    options: SessionOptions,
    cancel: CancelFlag,
}

impl WatchSession {
    pub fn new(scanner: Scanner, options: SessionOptions, cancel: CancelFlag) -> Self {
        Self {
            scanner,
            options,
            cancel,
        }
    }

    /// Run until the session is done: after one pass for a one-shot session,
    /// on cancellation otherwise.
    ///
    /// After every pass the changed files are dispatched (unless the pass is
    /// update-only), then the cache is saved iff the pass found changes.
    pub async fn run(mut self, modules: &mut [Box<dyn Module>]) -> Result<SessionSummary> {
        let mut summary = SessionSummary {
            passes: 0,
            changed_files: 0,
            cancelled: false,
        };
        let mut first_pass = true;
        let mut update_only = self.options.update_only;

        loop {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let pass = self.scanner.run_pass(first_pass);
            summary.passes += 1;
            summary.changed_files += pass.changed.len();

            if update_only {
                info!(
                    changed = pass.changed.len(),
                    "update-only pass, modules not dispatched"
                );
            } else {
                dispatch(modules, &pass);
            }

            if pass.has_changes() {
                self.scanner.save_cache()?;
            }

            let Some(interval) = self.options.interval else {
                break;
            };

            // Past the first pass a repeating session always dispatches,
            // whatever `update_only` started as.
            first_pass = false;
            update_only = false;

            debug!(?interval, "sleeping until next pass");
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
            }
        }

        info!(
            passes = summary.passes,
            changed = summary.changed_files,
            cancelled = summary.cancelled,
            "session finished"
        );
        Ok(summary)
    }
}

/// Hand every changed file to each module assigned to it, in module order.
/// Module failures are isolated per file; they never abort the pass.
fn dispatch(modules: &mut [Box<dyn Module>], pass: &ScanPass) {
    for file in &pass.changed {
        for module_name in &file.modules {
            let Some(module) = modules.iter_mut().find(|m| m.name() == module_name) else {
                continue;
            };
            if let Err(err) = module.process(&file.path) {
                warn!(module = %module_name, path = ?file.path, %err, "module failed on file");
            }
        }
    }

    for module in modules.iter_mut() {
        if let Err(err) = module.finish_pass() {
            warn!(module = module.name(), %err, "module failed to finish pass");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_flag_resolves_waiters() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());

        let waiter = {
            let flag = flag.clone();
            tokio::spawn(async move { flag.cancelled().await })
        };

        flag.cancel();
        assert!(flag.is_cancelled());
        waiter.await.unwrap();
    }
}
