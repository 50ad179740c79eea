use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "PHISH_GUARD_HOME";

pub fn base_dir() -> anyhow::Result<PathBuf> {
  if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
    return Ok(PathBuf::from(dir));
  }

  #[cfg(windows)]
  {
    if let Some(appdata) = std::env::var_os("APPDATA") {
      return Ok(PathBuf::from(appdata).join("phish-guard"));
    }
  }

  let home = std::env::var_os("HOME")
    .ok_or_else(|| anyhow::anyhow!("cannot locate a home directory; set {HOME_ENV}"))?;
  Ok(PathBuf::from(home).join(".phish-guard"))
}

pub fn config_path(base: &Path) -> PathBuf {
  base.join("config.toml")
}

pub fn logs_dir(base: &Path) -> PathBuf {
  base.join("logs")
}
