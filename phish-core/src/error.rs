use thiserror::Error;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a URL to check.";
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL.";
pub const CHECK_FAILED_MESSAGE: &str = "Not a valid website. Please check the URL and try again.";

#[derive(Debug, Error)]
pub enum CheckError {
  #[error("no URL was entered")]
  EmptyInput,

  #[error("invalid URL {input:?}: {reason}")]
  InvalidUrl { input: String, reason: String },

  #[error("scoring service rejected the URL: {0}")]
  Remote(String),

  #[error("scoring request failed: {0}")]
  Transport(String),
}

impl CheckError {
  pub fn invalid_url(input: &str, reason: impl ToString) -> Self {
    CheckError::InvalidUrl {
      input: input.to_string(),
      reason: reason.to_string(),
    }
  }

  /// Single line shown to the user. Remote and transport failures share one message;
  /// the underlying cause only goes to the log.
  pub fn user_message(&self) -> &'static str {
    match self {
      CheckError::EmptyInput => EMPTY_INPUT_MESSAGE,
      CheckError::InvalidUrl { .. } => INVALID_URL_MESSAGE,
      CheckError::Remote(_) | CheckError::Transport(_) => CHECK_FAILED_MESSAGE,
    }
  }
}

impl From<reqwest::Error> for CheckError {
  fn from(e: reqwest::Error) -> Self {
    CheckError::Transport(e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn remote_and_transport_collapse_to_one_message() {
    let a = CheckError::Remote("Invalid domain format".to_string());
    let b = CheckError::Transport("connection refused".to_string());
    assert_eq!(a.user_message(), b.user_message());
    assert_eq!(a.user_message(), CHECK_FAILED_MESSAGE);
  }

  #[test]
  fn input_errors_have_distinct_messages() {
    let empty = CheckError::EmptyInput;
    let invalid = CheckError::invalid_url("ht tp://", "bad host");
    assert_eq!(empty.user_message(), EMPTY_INPUT_MESSAGE);
    assert_eq!(invalid.user_message(), INVALID_URL_MESSAGE);
    assert_ne!(empty.user_message(), invalid.user_message());
  }
}
