//! Logging system configuration and initialization
//!
//! - Console output on stderr (stdout carries the scraped records)
//! - Optional file output through a non-blocking appender, plain or JSON
//! - Level from configuration, overridable with `RUST_LOG`
//! - Log files stored next to the executable, oldest pruned past `max_files`

#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "coach-scraper";

/// Dependencies that are chatty below `warn`; capped unless tracing is requested
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("h2", "warn"),
    ("thirtyfour", "info"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
    ("tokio", "info"),
];

// Keeps the file writer alive for the whole process
static LOG_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Log directory next to the executable
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Filter for the configured level with dependency noise capped.
/// `RUST_LOG` wins when set.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;
    if !level.to_lowercase().contains("trace") {
        for (target, cap) in NOISY_TARGETS {
            filter = filter.add_directive(format!("{target}={cap}").parse()?);
        }
    }
    Ok(filter)
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(&config.level)?;
    let log_dir = get_log_directory();

    let file_writer = if config.file_output {
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
        cleanup_old_logs(&log_dir, config.max_files)?;

        let appender = rolling::daily(&log_dir, format!("{LOG_FILE_PREFIX}.log"));
        let (writer, guard) = non_blocking(appender);
        if let Ok(mut slot) = LOG_GUARD.lock() {
            *slot = Some(guard);
        }
        Some(writer)
    } else {
        None
    };

    let json_file_layer = file_writer
        .clone()
        .filter(|_| config.json_format)
        .map(|writer| {
            fmt::Layer::new()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
        });

    let plain_file_layer = file_writer
        .filter(|_| !config.json_format)
        .map(|writer| {
            fmt::Layer::new()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false)
        });

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    Registry::default()
        .with(env_filter)
        .with(json_file_layer)
        .with(plain_file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!("Log directory: {:?} (json: {})", log_dir, config.json_format);
    }
    Ok(())
}

/// Delete the oldest log files beyond `max_files`
pub fn cleanup_old_logs(log_dir: &Path, max_files: u32) -> Result<()> {
    if !log_dir.exists() {
        return Ok(());
    }

    let mut log_files = Vec::new();
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if path.is_file() && is_log {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                log_files.push((path, modified));
            }
        }
    }

    // newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let keep = max_files as usize;
    if log_files.len() > keep {
        info!(
            "Removing {} old log files (keeping {})",
            log_files.len() - keep,
            keep
        );
        for (path, _) in log_files.iter().skip(keep) {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("Failed to remove old log file {:?}: {}", path, e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }

    #[test]
    fn test_build_env_filter_rejects_garbage() {
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_env_filter("debug").is_ok());
            assert!(build_env_filter("noisy=bogus").is_err());
        }
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        for i in 0..4u64 {
            let path = dir.path().join(format!("{LOG_FILE_PREFIX}.log.2026-01-0{}", i + 1));
            let file = std::fs::File::create(&path).unwrap();
            file.set_modified(now - Duration::from_secs(100 * (4 - i))).unwrap();
        }
        std::fs::write(dir.path().join("unrelated.txt"), "keep").unwrap();

        cleanup_old_logs(dir.path(), 2).unwrap();

        let mut remaining: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec![
                format!("{LOG_FILE_PREFIX}.log.2026-01-03"),
                format!("{LOG_FILE_PREFIX}.log.2026-01-04"),
                "unrelated.txt".to_string(),
            ]
        );
    }
}
