//! Logging setup using the tracing ecosystem.
//!
//! The client itself only emits `tracing` events (API traffic is logged at
//! debug level by [`TracingLogger`](crate::api::TracingLogger)). These helpers
//! install a subscriber for programs and tests that want to see them:
//! - Environment-based log level configuration via `RUST_LOG`
//! - Output to stderr, or to daily rotated files

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "github_issues_import=info,warn";

/// File name prefix for rotated log files.
const LOG_FILE_NAME: &str = "github-issues-import.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a global subscriber writing to stderr.
///
/// Set `RUST_LOG=github_issues_import=debug` to see every API request and
/// response.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(env_filter());

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install a global subscriber writing daily rotated files into `log_dir`.
///
/// # Errors
///
/// Returns an error if:
/// - The log directory cannot be created
/// - A global subscriber is already set
pub fn init_with_file(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(env_filter());

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(log_dir = %log_dir.display(), "Log directory");
    Ok(())
}

/// Get the log directory path.
///
/// Returns the platform-specific local data directory with
/// `github-issues-import/logs` appended.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("github-issues-import").join("logs"))
}

/// Default directory for [`init_with_file`].
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("github-issues-import/logs"));
        }
    }

    #[test]
    #[serial]
    fn test_init_with_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        // Another test may already own the global subscriber; the directory
        // is created either way.
        let _ = init_with_file(&log_dir);
        assert!(log_dir.is_dir());
    }

    #[test]
    #[serial]
    fn test_second_init_fails() {
        let _ = init();
        assert!(init().is_err());
    }
}
