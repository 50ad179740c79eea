use serde::{Deserialize, Serialize};

/// Verdict for one submitted URL. Built once per submission and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
  pub is_phishing: bool,
  pub url: String,
  pub confidence: u8,
  pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
  Heuristic,
  Remote,
}

impl ScorerKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ScorerKind::Heuristic => "heuristic",
      ScorerKind::Remote => "remote",
    }
  }
}

pub fn redact_url_for_log(url: &str) -> String {
  // Query strings and fragments can carry tokens; log scheme, host and path only.
  let end = url.find(['?', '#']).unwrap_or(url.len());
  url[..end].to_string()
}

pub fn now_unix_ms() -> u64 {
  use std::time::{SystemTime, UNIX_EPOCH};
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_millis() as u64
}
