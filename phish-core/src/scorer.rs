use crate::config::Config;
use crate::error::CheckError;
use crate::heuristic::{self, HeuristicScorer};
use crate::normalize::NormalizedUrl;
use crate::remote::RemoteScorer;
use crate::types::{ScoreResult, ScorerKind};

/// Turns an already-normalized URL into a verdict.
pub trait UrlScorer {
  fn name(&self) -> &'static str;
  fn score(&self, url: &NormalizedUrl) -> Result<ScoreResult, CheckError>;
}

pub fn build(cfg: &Config) -> anyhow::Result<Box<dyn UrlScorer>> {
  match cfg.scorer {
    ScorerKind::Heuristic => {
      tracing::info!(
        predicates = ?heuristic::predicate_ids(),
        tokens = cfg.heuristic.tokens.len(),
        "using heuristic scorer"
      );
      Ok(Box::new(HeuristicScorer::new(&cfg.heuristic)))
    }
    ScorerKind::Remote => {
      let scorer = RemoteScorer::new(&cfg.remote)?;
      tracing::info!(endpoint = %cfg.remote.endpoint, "using remote scorer");
      Ok(Box::new(scorer))
    }
  }
}
