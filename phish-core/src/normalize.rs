use crate::error::CheckError;
use reqwest::Url;

/// A trimmed, scheme-prefixed URL that passed parsing and has a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
  text: String,
  parsed: Url,
}

impl NormalizedUrl {
  /// The normalized text as entered (after trimming and scheme prefixing).
  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn parsed(&self) -> &Url {
    &self.parsed
  }

  /// Lowercased host. Always present; construction rejects host-less URLs.
  pub fn host(&self) -> String {
    self
      .parsed
      .host_str()
      .unwrap_or_default()
      .to_ascii_lowercase()
  }

  pub fn is_insecure(&self) -> bool {
    self.parsed.scheme() == "http"
  }
}

pub fn normalize(raw: &str) -> Result<NormalizedUrl, CheckError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(CheckError::EmptyInput);
  }

  let text = if has_web_scheme(trimmed) {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let parsed = Url::parse(&text).map_err(|e| CheckError::invalid_url(trimmed, e))?;
  if parsed.host_str().map(|h| h.is_empty()).unwrap_or(true) {
    return Err(CheckError::invalid_url(trimmed, "URL has no host"));
  }

  Ok(NormalizedUrl { text, parsed })
}

fn has_web_scheme(s: &str) -> bool {
  ["http://", "https://"].iter().any(|prefix| {
    s.get(..prefix.len())
      .map(|head| head.eq_ignore_ascii_case(prefix))
      .unwrap_or(false)
  })
}
