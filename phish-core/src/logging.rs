use crate::config::LoggingConfig;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "phish-guard.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
  /// Daily-rolled file only; keeps stdout/stderr free for verdicts.
  File,
  FileAndStderr,
}

pub fn init(log_dir: &Path, cfg: &LoggingConfig, output: LogOutput) -> anyhow::Result<()> {
  fs::create_dir_all(log_dir)?;
  cleanup_old_logs(log_dir, cfg.retention_days, SystemTime::now());

  let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
  let _ = FILE_GUARD.set(guard);

  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(file_writer)
    .with_target(true);

  let stderr_layer = (output == LogOutput::FileAndStderr).then(|| {
    tracing_subscriber::fmt::layer()
      .with_ansi(false)
      .with_writer(std::io::stderr)
      .with_target(false)
  });

  tracing_subscriber::registry()
    .with(build_filter(&cfg.level))
    .with(file_layer)
    .with(stderr_layer)
    .try_init()
    .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;

  Ok(())
}

// RUST_LOG wins over the configured level; an unparsable level falls back to info.
fn build_filter(level: &str) -> EnvFilter {
  EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn cleanup_old_logs(log_dir: &Path, retention_days: u64, now: SystemTime) -> usize {
  if retention_days == 0 {
    return 0;
  }

  let cutoff = now
    .checked_sub(Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60)))
    .unwrap_or(SystemTime::UNIX_EPOCH);

  let Ok(entries) = fs::read_dir(log_dir) else {
    return 0;
  };

  let mut removed = 0;
  for entry in entries.flatten() {
    let path = entry.path();
    if !is_app_log_file(&path) {
      continue;
    }

    let modified = match entry.metadata().and_then(|m| m.modified()) {
      Ok(t) => t,
      Err(_) => continue,
    };

    if modified < cutoff && fs::remove_file(&path).is_ok() {
      removed += 1;
    }
  }

  removed
}

fn is_app_log_file(path: &Path) -> bool {
  let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
    return false;
  };

  name == LOG_FILE_NAME
    || name
      .strip_prefix(LOG_FILE_NAME)
      .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognizes_rolled_log_names() {
    assert!(is_app_log_file(Path::new("/logs/phish-guard.log")));
    assert!(is_app_log_file(Path::new("/logs/phish-guard.log.2026-10-01")));
    assert!(!is_app_log_file(Path::new("/logs/phish-guard.logger")));
    assert!(!is_app_log_file(Path::new("/logs/config.toml")));
  }

  #[test]
  fn cleanup_only_touches_expired_app_logs() {
    let dir = std::env::temp_dir().join(format!("phish-guard-logs-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("phish-guard.log.2026-01-01"), "old").unwrap();
    fs::write(dir.join("notes.txt"), "keep").unwrap();

    // Nothing is older than a week yet.
    assert_eq!(cleanup_old_logs(&dir, 7, SystemTime::now()), 0);

    let later = SystemTime::now() + Duration::from_secs(30 * 24 * 60 * 60);
    assert_eq!(cleanup_old_logs(&dir, 7, later), 1);
    assert!(!dir.join("phish-guard.log.2026-01-01").exists());
    assert!(dir.join("notes.txt").exists());

    assert_eq!(cleanup_old_logs(&dir, 0, later), 0);
    let _ = fs::remove_dir_all(dir);
  }
}
