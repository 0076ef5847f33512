// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod modules;
pub mod scan;
pub mod types;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, load_or_default, write_sample, ConfigFile};
use crate::errors::{JanitorError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::modules::{build_modules, known_names, Sequence, Versioner};
use crate::scan::{
    descriptors_from_config, global_table_from_config, CancelFlag, ChangeDetector,
    ExclusionResolver, FingerprintCache, Scanner, SessionOptions, WatchSession, CACHE_DIR,
};
use crate::types::HashAlgorithm;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the fingerprint cache and the exclusion resolver
/// - the scanner and the watch session
/// - the downstream modules
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let root = working_path(fs.as_ref(), args.path.as_deref());
    info!(?root, "working path");
    let cache_dir = root.join(CACHE_DIR);

    if args.generate {
        let written = write_sample(fs.as_ref(), &root)?;
        info!(?written, "sample configuration generated");
        println!("{}", written.display());
        return Ok(());
    }

    let cfg = load_config(fs.as_ref(), &args, &root)?;

    // `--increase` bumps a sequence directly, no scan involved.
    if let Some(sequence) = args.increase {
        let mut versioner = Versioner::new(fs.clone(), &cache_dir, &cfg.versioner);
        versioner.increase(sequence_from_arg(sequence));
        versioner.save()?;
        info!(version = %versioner.version_string(), "version increased");
        println!("{}", versioner.version_string());
        return Ok(());
    }

    let disabled = disabled_modules(&args.exclude);
    let algorithm: HashAlgorithm = args.algorithm.into();
    info!(algorithm = algorithm.name(), "fingerprint algorithm");

    let mut cache = FingerprintCache::load(fs.as_ref(), &root, algorithm);
    if args.rebuild {
        info!("rebuilding fingerprint cache");
        cache.clear();
    }

    let resolver = ExclusionResolver::new(
        global_table_from_config(&cfg),
        descriptors_from_config(&cfg, &disabled),
    );
    let scanner = Scanner::new(
        fs.clone(),
        root,
        resolver,
        ChangeDetector::new(cache),
        algorithm,
    );

    let mut modules = build_modules(&cfg, fs, &cache_dir, &disabled)?;

    // Ctrl-C → graceful shutdown at the next pass boundary.
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    let options = SessionOptions {
        interval: watch_interval(args.watch)?,
        update_only: args.update,
    };

    let session = WatchSession::new(scanner, options, cancel);
    let summary = session.run(&mut modules).await?;

    info!(
        passes = summary.passes,
        changed = summary.changed_files,
        "janitor finished"
    );
    Ok(())
}

fn working_path(fs: &dyn FileSystem, arg: Option<&str>) -> PathBuf {
    let raw = match arg {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    fs.canonicalize(&raw).unwrap_or(raw)
}

fn load_config(fs: &dyn FileSystem, args: &CliArgs, root: &std::path::Path) -> Result<ConfigFile> {
    if args.default {
        info!("using builtin default configuration");
        return Ok(ConfigFile::builtin_default());
    }
    if let Some(ref path) = args.config {
        info!(%path, "using manually specified configuration file");
        return load_and_validate(fs, path);
    }
    load_or_default(fs, root)
}

/// Per-run module exclusions; unknown names are ignored with a warning,
/// matching the documented CLI behaviour.
fn disabled_modules(excluded: &[String]) -> HashSet<String> {
    let known = known_names();
    let mut disabled = HashSet::new();
    for name in excluded {
        if known.contains(&name.as_str()) {
            disabled.insert(name.clone());
        } else {
            warn!(module = %name, "unknown module in --exclude, ignoring");
        }
    }
    disabled
}

fn watch_interval(seconds: Option<f64>) -> Result<Option<Duration>> {
    match seconds {
        None => Ok(None),
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            Ok(Some(Duration::from_secs_f64(secs)))
        }
        Some(secs) => Err(JanitorError::ConfigError(format!(
            "--watch interval must be a non-negative number of seconds (got {secs})"
        ))),
    }
}

fn sequence_from_arg(arg: cli::SequenceArg) -> Sequence {
    match arg {
        cli::SequenceArg::Major => Sequence::Major,
        cli::SequenceArg::Minor => Sequence::Minor,
        cli::SequenceArg::Maintenance => Sequence::Maintenance,
        cli::SequenceArg::Build => Sequence::Build,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_watch_interval_is_rejected() {
        assert!(watch_interval(Some(-1.0)).is_err());
        assert!(watch_interval(Some(f64::NAN)).is_err());
        assert_eq!(watch_interval(None).unwrap(), None);
        assert_eq!(
            watch_interval(Some(0.5)).unwrap(),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn unknown_excluded_modules_are_dropped() {
        let disabled = disabled_modules(&[
            "tagger".to_string(),
            "linter".to_string(),
        ]);
        assert!(disabled.contains("tagger"));
        assert!(!disabled.contains("linter"));
        assert_eq!(disabled.len(), 1);
    }
}
