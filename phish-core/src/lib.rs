pub mod config;
pub mod error;
pub mod features;
pub mod heuristic;
pub mod logging;
pub mod normalize;
pub mod paths;
pub mod remote;
pub mod scorer;
pub mod session;
pub mod types;

pub use error::CheckError;
pub use normalize::{normalize, NormalizedUrl};
pub use scorer::UrlScorer;
pub use session::CheckSession;
pub use types::{ScoreResult, ScorerKind};

/// Loads (or creates) the config under the base dir and installs logging.
pub fn init_from_env(output: logging::LogOutput) -> anyhow::Result<config::Config> {
  let base = paths::base_dir()?;
  let cfg = config::load_or_create_default(&paths::config_path(&base))?;

  logging::init(&paths::logs_dir(&base), &cfg.logging, output)?;

  if let Some(reason) = cfg.scorer_fallback.as_deref() {
    tracing::warn!(
      reason = %reason,
      "remote scorer config invalid; falling back to heuristic scorer"
    );
  }

  tracing::info!(
    version = env!("CARGO_PKG_VERSION"),
    scorer = cfg.scorer.as_str(),
    base = %base.display(),
    "phish-guard starting"
  );
  Ok(cfg)
}
