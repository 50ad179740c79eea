use crate::error::CheckError;
use crate::normalize::{normalize, NormalizedUrl};
use crate::scorer::UrlScorer;
use crate::types::{redact_url_for_log, ScoreResult};
use std::time::Instant;
use uuid::Uuid;

/// A check that has been started but not yet completed.
#[derive(Debug)]
pub struct PendingCheck {
  pub check_id: Uuid,
  pub url: NormalizedUrl,
  started: Instant,
}

/// Front-end state for one input box: the text, whether a check is outstanding, and the
/// last result or error. At most one of `result`/`error` is set.
#[derive(Debug, Default)]
pub struct CheckSession {
  input: String,
  loading: bool,
  result: Option<ScoreResult>,
  error: Option<String>,
}

impl CheckSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_input(&mut self, text: impl Into<String>) {
    self.input = text.into();
  }

  pub fn input(&self) -> &str {
    &self.input
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn result(&self) -> Option<&ScoreResult> {
    self.result.as_ref()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// Validates the current input and marks the session busy. Returns `None` when a check
  /// is already outstanding or the input was rejected (the error is then set).
  pub fn begin(&mut self) -> Option<PendingCheck> {
    if self.loading {
      tracing::warn!("submit ignored; a check is already in progress");
      return None;
    }

    self.result = None;
    self.error = None;

    let url = match normalize(&self.input) {
      Ok(u) => u,
      Err(e) => {
        tracing::info!(reason = %e, "input rejected");
        self.error = Some(e.user_message().to_string());
        return None;
      }
    };

    self.loading = true;
    Some(PendingCheck {
      check_id: Uuid::new_v4(),
      url,
      started: Instant::now(),
    })
  }

  pub fn complete(&mut self, pending: PendingCheck, outcome: Result<ScoreResult, CheckError>) {
    self.loading = false;
    let elapsed_ms = pending.started.elapsed().as_millis() as u64;

    match outcome {
      Ok(result) => {
        tracing::info!(
          check_id = %pending.check_id,
          url = %redact_url_for_log(&result.url),
          is_phishing = result.is_phishing,
          confidence = result.confidence,
          factors = result.risk_factors.len(),
          elapsed_ms,
          "check complete"
        );
        self.result = Some(result);
      }
      Err(e) => {
        tracing::warn!(
          check_id = %pending.check_id,
          url = %redact_url_for_log(pending.url.as_str()),
          error = %e,
          elapsed_ms,
          "check failed"
        );
        self.error = Some(e.user_message().to_string());
      }
    }
  }

  pub fn submit(&mut self, scorer: &dyn UrlScorer) {
    let Some(pending) = self.begin() else {
      return;
    };
    let outcome = scorer.score(&pending.url);
    self.complete(pending, outcome);
  }
}
