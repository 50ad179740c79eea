use crate::heuristic::rules::DEFAULT_TOKENS;
use crate::types::{now_unix_ms, ScorerKind};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Config {
  pub scorer: ScorerKind,
  pub logging: LoggingConfig,
  pub remote: RemoteConfig,
  pub heuristic: HeuristicConfig,
  /// Set when `scorer = "remote"` was requested but the remote settings were rejected.
  pub scorer_fallback: Option<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      scorer: ScorerKind::Heuristic,
      logging: LoggingConfig::default(),
      remote: RemoteConfig::default(),
      heuristic: HeuristicConfig::default(),
      scorer_fallback: None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_retention_days() -> u64 {
  14
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      retention_days: default_retention_days(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
  #[serde(default = "default_remote_endpoint")]
  pub endpoint: String,

  #[serde(default = "default_remote_timeout_seconds")]
  pub timeout_seconds: u64,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      endpoint: default_remote_endpoint(),
      timeout_seconds: default_remote_timeout_seconds(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
  #[serde(default = "default_tokens")]
  pub tokens: Vec<String>,

  #[serde(default = "default_max_host_length")]
  pub max_host_length: usize,
}

impl Default for HeuristicConfig {
  fn default() -> Self {
    Self {
      tokens: default_tokens(),
      max_host_length: default_max_host_length(),
    }
  }
}

fn default_remote_endpoint() -> String {
  "http://127.0.0.1:5005/predict".to_string()
}

fn default_remote_timeout_seconds() -> u64 {
  10
}

fn default_tokens() -> Vec<String> {
  DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect()
}

fn default_max_host_length() -> usize {
  30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
  #[serde(default)]
  pub scorer: Option<ScorerKind>,

  #[serde(default)]
  pub logging: Option<LoggingConfig>,

  #[serde(default)]
  pub remote: Option<RemoteConfig>,

  #[serde(default)]
  pub heuristic: Option<HeuristicConfig>,
}

impl ConfigFile {
  fn normalize(self) -> Config {
    let mut cfg = Config::default();
    if let Some(s) = self.scorer {
      cfg.scorer = s;
    }
    if let Some(l) = self.logging {
      cfg.logging = l;
    }
    if let Some(r) = self.remote {
      cfg.remote = r;
    }
    if let Some(h) = self.heuristic {
      cfg.heuristic = h;
    }

    if cfg.scorer == ScorerKind::Remote {
      if let Some(reason) = validate_remote_config(&cfg.remote) {
        cfg.scorer = ScorerKind::Heuristic;
        // Logging is not installed yet; the caller logs `scorer_fallback` once it is.
        eprintln!(
          "phish-guard: remote scorer config invalid ({reason}); falling back to heuristic scorer"
        );
        cfg.scorer_fallback = Some(reason);
      }
    }

    cfg
  }

  fn needs_upgrade(&self) -> bool {
    self.scorer.is_none()
      || self.logging.is_none()
      || self.remote.is_none()
      || self.heuristic.is_none()
  }
}

pub fn load_or_create_default(path: &Path) -> anyhow::Result<Config> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("config path has no parent: {}", path.display()))?;
  fs::create_dir_all(parent)?;

  if !path.exists() {
    let cfg = Config::default();
    write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
    return Ok(cfg);
  }

  let raw = fs::read_to_string(path)?;
  match toml::from_str::<ConfigFile>(&raw) {
    Ok(file) => {
      let upgrade = file.needs_upgrade();
      let cfg = file.normalize();
      if upgrade {
        let backup = parent.join(format!("config.toml.bak-{}", now_unix_ms() / 1000));
        let _ = fs::copy(path, &backup);
        let _ = write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?);
        eprintln!(
          "phish-guard: upgraded config defaults written to {} (backup: {})",
          path.display(),
          backup.display()
        );
      }
      Ok(cfg)
    }
    Err(e) => {
      let cfg = Config::default();
      let backup = parent.join(format!("config.toml.bad-{}", now_unix_ms() / 1000));
      let _ = fs::rename(path, &backup);
      write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
      eprintln!(
        "phish-guard: invalid config at {} (backed up to {}): {e}",
        path.display(),
        backup.display()
      );
      Ok(cfg)
    }
  }
}

fn to_config_file(cfg: &Config) -> ConfigFile {
  ConfigFile {
    scorer: Some(cfg.scorer),
    logging: Some(cfg.logging.clone()),
    remote: Some(cfg.remote.clone()),
    heuristic: Some(cfg.heuristic.clone()),
  }
}

fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("file path has no parent: {}", path.display()))?;
  let tmp = parent.join(format!(
    ".{}.tmp",
    path.file_name().unwrap_or_default().to_string_lossy()
  ));

  fs::write(&tmp, contents)?;
  fs::rename(&tmp, path)?;
  Ok(())
}

pub fn validate_remote_config(cfg: &RemoteConfig) -> Option<String> {
  if cfg.timeout_seconds == 0 {
    return Some("timeout_seconds must be > 0".to_string());
  }

  let Ok(url) = Url::parse(&cfg.endpoint) else {
    return Some(format!("invalid endpoint URL: {}", cfg.endpoint));
  };
  if url.scheme() != "http" && url.scheme() != "https" {
    return Some(format!("endpoint must use HTTP or HTTPS: {}", cfg.endpoint));
  }
  if url.host_str().is_none() {
    return Some(format!("endpoint has no host: {}", cfg.endpoint));
  }

  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("phish-guard-test-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn missing_config_is_created_with_defaults() {
    let dir = scratch_dir();
    let path = dir.join("config.toml");

    let cfg = load_or_create_default(&path).unwrap();
    assert_eq!(cfg.scorer, ScorerKind::Heuristic);
    assert_eq!(cfg.heuristic.max_host_length, 30);
    assert!(path.exists());

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("paypal-secure"));
    assert!(raw.contains("127.0.0.1:5005/predict"));

    let _ = fs::remove_dir_all(dir);
  }

  #[test]
  fn partial_config_is_upgraded_and_keeps_values() {
    let dir = scratch_dir();
    let path = dir.join("config.toml");
    fs::write(&path, "scorer = \"remote\"\n[logging]\nlevel = \"debug\"\n").unwrap();

    let cfg = load_or_create_default(&path).unwrap();
    assert_eq!(cfg.scorer, ScorerKind::Remote);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.retention_days, 14);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("[remote]"));
    assert!(raw.contains("[heuristic]"));

    let _ = fs::remove_dir_all(dir);
  }

  #[test]
  fn unparsable_config_is_replaced_with_defaults() {
    let dir = scratch_dir();
    let path = dir.join("config.toml");
    fs::write(&path, "scorer = [not toml").unwrap();

    let cfg = load_or_create_default(&path).unwrap();
    assert_eq!(cfg.scorer, ScorerKind::Heuristic);
    let backups = fs::read_dir(&dir)
      .unwrap()
      .flatten()
      .filter(|e| e.file_name().to_string_lossy().starts_with("config.toml.bad-"))
      .count();
    assert_eq!(backups, 1);

    let _ = fs::remove_dir_all(dir);
  }

  #[test]
  fn invalid_remote_endpoint_falls_back_to_heuristic() {
    let file = ConfigFile {
      scorer: Some(ScorerKind::Remote),
      logging: None,
      remote: Some(RemoteConfig {
        endpoint: "ftp://127.0.0.1/predict".to_string(),
        timeout_seconds: 5,
      }),
      heuristic: None,
    };
    let cfg = file.normalize();
    assert_eq!(cfg.scorer, ScorerKind::Heuristic);
    let reason = cfg.scorer_fallback.expect("fallback reason recorded");
    assert!(reason.contains("ftp://127.0.0.1/predict"), "{reason}");
  }

  #[test]
  fn remote_fallback_from_file_keeps_reason() {
    let dir = scratch_dir();
    let path = dir.join("config.toml");
    fs::write(
      &path,
      "scorer = \"remote\"\n[remote]\nendpoint = \"ftp://x/predict\"\ntimeout_seconds = 5\n",
    )
    .unwrap();

    let cfg = load_or_create_default(&path).unwrap();
    assert_eq!(cfg.scorer, ScorerKind::Heuristic);
    assert!(cfg.scorer_fallback.is_some());

    let valid = load_or_create_default(&dir.join("other.toml")).unwrap();
    assert!(valid.scorer_fallback.is_none());

    let _ = fs::remove_dir_all(dir);
  }

  #[test]
  fn remote_config_validation() {
    assert!(validate_remote_config(&RemoteConfig::default()).is_none());

    let zero_timeout = RemoteConfig {
      timeout_seconds: 0,
      ..RemoteConfig::default()
    };
    assert!(validate_remote_config(&zero_timeout).is_some());

    let garbage = RemoteConfig {
      endpoint: "not a url".to_string(),
      ..RemoteConfig::default()
    };
    assert!(validate_remote_config(&garbage).is_some());
  }
}
