use crate::config::RemoteConfig;
use crate::error::CheckError;
use crate::normalize::NormalizedUrl;
use crate::scorer::UrlScorer;
use crate::types::{redact_url_for_log, ScoreResult};

pub mod client;
pub mod schema;

use client::PredictClient;
use schema::PredictReply;

pub const FLAGGED_CONFIDENCE: u8 = 94;
pub const CLEAN_CONFIDENCE: u8 = 98;

pub const FLAGGED_RISK_FACTORS: [&str; 2] = [
  "Flagged by the phishing classification model",
  "URL characteristics match known phishing sites",
];

pub struct RemoteScorer {
  client: PredictClient,
}

impl RemoteScorer {
  pub fn new(cfg: &RemoteConfig) -> anyhow::Result<Self> {
    Ok(Self {
      client: PredictClient::new(cfg)?,
    })
  }
}

impl UrlScorer for RemoteScorer {
  fn name(&self) -> &'static str {
    "remote"
  }

  fn score(&self, url: &NormalizedUrl) -> Result<ScoreResult, CheckError> {
    tracing::debug!(
      endpoint = %self.client.endpoint(),
      url = %redact_url_for_log(url.as_str()),
      "requesting remote verdict"
    );
    let reply = self.client.predict(url.as_str())?;
    map_reply(reply, url.as_str())
  }
}

/// Confidence and risk factors are fixed per verdict; the service only returns a boolean.
pub fn map_reply(reply: PredictReply, submitted_url: &str) -> Result<ScoreResult, CheckError> {
  if let Some(err) = reply.error {
    return Err(CheckError::Remote(err));
  }

  let is_phishing = reply
    .is_phishing
    .ok_or_else(|| CheckError::Remote("reply missing isPhishing".to_string()))?;

  let (confidence, risk_factors): (u8, Vec<String>) = if is_phishing {
    (
      FLAGGED_CONFIDENCE,
      FLAGGED_RISK_FACTORS.iter().map(|s| s.to_string()).collect(),
    )
  } else {
    (CLEAN_CONFIDENCE, Vec::new())
  };

  Ok(ScoreResult {
    is_phishing,
    url: reply.url.unwrap_or_else(|| submitted_url.to_string()),
    confidence,
    risk_factors,
  })
}
