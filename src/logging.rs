use std::path::{Path, PathBuf};

use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use crate::config;

/// Start a rotating file logger in `log_dir`, duplicating warnings to stderr.
///
/// The library only emits through the `log` facade; hosts that already run a
/// logger should skip this. Keep the returned handle alive for the process lifetime.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed creating log dir {}", log_dir.display()))?;

    let handle = Logger::try_with_str("debug")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(config::logging::LOG_FILE_NAME),
        )
        .rotate(
            Criterion::Size(config::logging::LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config::logging::LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!("{}", "=".repeat(60));
    log::info!("seqfeat {} logging started", config::VERSION);
    log::info!("Platform: {}", std::env::consts::OS);
    log::info!("{}", "=".repeat(60));

    Ok(handle)
}

/// `$HOME/.seqfeat/logs` (or `%USERPROFILE%` on Windows).
pub fn default_log_dir() -> anyhow::Result<PathBuf> {
    let home = home_dir().context("cannot determine home directory for logs")?;
    Ok(home.join(config::logging::LOG_DIR_REL))
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    if let Ok(v) = std::env::var("HOME") {
        if !v.is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    // Windows fallback
    if let Ok(v) = std::env::var("USERPROFILE") {
        if !v.is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir_is_under_home() {
        if let Some(home) = home_dir() {
            let dir = default_log_dir().unwrap();
            assert!(dir.starts_with(&home));
            assert!(dir.ends_with(config::logging::LOG_DIR_REL));
        }
    }
}
