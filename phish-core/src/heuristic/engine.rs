use crate::config::HeuristicConfig;
use crate::error::CheckError;
use crate::normalize::NormalizedUrl;
use crate::scorer::UrlScorer;
use crate::types::ScoreResult;
use rand::Rng;
use std::ops::RangeInclusive;

use super::rules::{self, RiskPredicate};

pub const CONFIDENCE_RANGE: RangeInclusive<u8> = 80..=99;

// Two weak structural signals are enough on their own, even with no token match.
const RISK_FACTOR_THRESHOLD: usize = 2;

pub struct HeuristicScorer {
  tokens: Vec<String>,
  predicates: Vec<RiskPredicate>,
  max_host_length: usize,
}

impl HeuristicScorer {
  pub fn new(cfg: &HeuristicConfig) -> Self {
    Self {
      tokens: cfg.tokens.clone(),
      predicates: RiskPredicate::ALL.to_vec(),
      max_host_length: cfg.max_host_length,
    }
  }

  pub fn score_with_rng<R: Rng + ?Sized>(&self, url: &NormalizedUrl, rng: &mut R) -> ScoreResult {
    let host = url.host();
    let full = url.as_str().to_ascii_lowercase();

    let matched = rules::first_matching_token(&self.tokens, &[host.as_str(), full.as_str()]);

    let risk_factors: Vec<String> = self
      .predicates
      .iter()
      .filter(|p| p.holds(url, &host, self.max_host_length))
      .map(|p| p.meta().label.to_string())
      .collect();

    let is_phishing = matched.is_some() || risk_factors.len() >= RISK_FACTOR_THRESHOLD;

    tracing::debug!(
      host = %host,
      token = matched.unwrap_or("-"),
      factors = risk_factors.len(),
      is_phishing,
      "heuristic verdict"
    );

    ScoreResult {
      is_phishing,
      url: url.as_str().to_string(),
      confidence: rng.gen_range(CONFIDENCE_RANGE),
      risk_factors,
    }
  }
}

impl UrlScorer for HeuristicScorer {
  fn name(&self) -> &'static str {
    "heuristic"
  }

  fn score(&self, url: &NormalizedUrl) -> Result<ScoreResult, CheckError> {
    Ok(self.score_with_rng(url, &mut rand::thread_rng()))
  }
}
