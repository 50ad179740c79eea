// Ternary URL signals in the layout the remote classifier was trained on. Only the
// columns derivable from the URL text are computed.

use crate::error::CheckError;
use crate::normalize::NormalizedUrl;
use serde::Serialize;
use std::net::Ipv4Addr;

const SHORTENING_SERVICES: &[&str] = &[
  "bit.ly", "goo.gl", "shorte.st", "go2l.ink", "x.co", "ow.ly", "t.co", "tinyurl", "tr.im",
  "is.gd",
];

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i8")]
pub enum Signal {
  Legitimate,
  Suspicious,
  Phishing,
}

impl From<Signal> for i8 {
  fn from(s: Signal) -> i8 {
    match s {
      Signal::Legitimate => 1,
      Signal::Suspicious => 0,
      Signal::Phishing => -1,
    }
  }
}

impl Signal {
  fn flag(phishing: bool) -> Self {
    if phishing {
      Signal::Phishing
    } else {
      Signal::Legitimate
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlFeatures {
  #[serde(rename = "having_IP_Address")]
  pub ip_address: Signal,
  #[serde(rename = "URL_Length")]
  pub url_length: Signal,
  #[serde(rename = "Shortining_Service")]
  pub shortening_service: Signal,
  #[serde(rename = "having_At_Symbol")]
  pub at_symbol: Signal,
  #[serde(rename = "double_slash_redirecting")]
  pub double_slash_redirecting: Signal,
  #[serde(rename = "Prefix_Suffix")]
  pub prefix_suffix: Signal,
  #[serde(rename = "having_Sub_Domain")]
  pub sub_domain: Signal,
  #[serde(rename = "SSLfinal_State")]
  pub ssl_state: Signal,
  #[serde(rename = "port")]
  pub port: Signal,
  #[serde(rename = "HTTPS_token")]
  pub https_token: Signal,
  #[serde(rename = "Submitting_to_email")]
  pub submitting_to_email: Signal,
}

impl UrlFeatures {
  pub fn entries(&self) -> [(&'static str, Signal); 11] {
    [
      ("having_IP_Address", self.ip_address),
      ("URL_Length", self.url_length),
      ("Shortining_Service", self.shortening_service),
      ("having_At_Symbol", self.at_symbol),
      ("double_slash_redirecting", self.double_slash_redirecting),
      ("Prefix_Suffix", self.prefix_suffix),
      ("having_Sub_Domain", self.sub_domain),
      ("SSLfinal_State", self.ssl_state),
      ("port", self.port),
      ("HTTPS_token", self.https_token),
      ("Submitting_to_email", self.submitting_to_email),
    ]
  }
}

pub fn extract(url: &NormalizedUrl) -> Result<UrlFeatures, CheckError> {
  let text = url.as_str();
  let parsed = url.parsed();
  let domain = network_location(url);

  if !is_valid_domain(&domain) {
    return Err(CheckError::invalid_url(text, "Invalid domain format"));
  }

  let length = text.chars().count();
  let url_length = if length < 54 {
    Signal::Legitimate
  } else if length <= 75 {
    Signal::Suspicious
  } else {
    Signal::Phishing
  };

  let sub_domain = match domain.split('.').count() {
    0..=2 => Signal::Legitimate,
    3 => Signal::Suspicious,
    _ => Signal::Phishing,
  };

  Ok(UrlFeatures {
    ip_address: Signal::flag(domain.parse::<Ipv4Addr>().is_ok()),
    url_length,
    shortening_service: Signal::flag(SHORTENING_SERVICES.iter().any(|s| text.contains(s))),
    at_symbol: Signal::flag(text.contains('@')),
    double_slash_redirecting: Signal::flag(text.rfind("//").map(|i| i > 6).unwrap_or(false)),
    prefix_suffix: Signal::flag(domain.contains('-')),
    sub_domain,
    ssl_state: Signal::flag(parsed.scheme() != "https"),
    port: Signal::flag(domain.contains(':')),
    https_token: Signal::flag(parsed.path().to_ascii_lowercase().contains("https")),
    submitting_to_email: Signal::flag(text.contains("mailto:")),
  })
}

/// `user:pass@host:port` as it appears between the scheme and the path.
fn network_location(url: &NormalizedUrl) -> String {
  let parsed = url.parsed();
  let mut out = String::new();
  if !parsed.username().is_empty() {
    out.push_str(parsed.username());
    if let Some(pw) = parsed.password() {
      out.push(':');
      out.push_str(pw);
    }
    out.push('@');
  }
  out.push_str(parsed.host_str().unwrap_or_default());
  if let Some(port) = parsed.port() {
    out.push_str(&format!(":{port}"));
  }
  out
}

/// A single alphanumeric label followed by one or more alphabetic labels of two or more letters.
pub fn is_valid_domain(domain: &str) -> bool {
  if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
    return false;
  }

  let mut labels = domain.split('.');
  let first = labels.next().unwrap_or_default();
  if first.is_empty()
    || first.len() > MAX_LABEL_LEN
    || first.starts_with('-')
    || first.ends_with('-')
    || !first.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
  {
    return false;
  }

  let rest: Vec<&str> = labels.collect();
  !rest.is_empty()
    && rest
      .iter()
      .all(|l| l.len() >= 2 && l.chars().all(|c| c.is_ascii_alphabetic()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::normalize;

  fn features(raw: &str) -> UrlFeatures {
    extract(&normalize(raw).unwrap()).unwrap()
  }

  #[test]
  fn domain_validation() {
    assert!(is_valid_domain("example.com"));
    assert!(is_valid_domain("www.example.co.uk"));
    assert!(is_valid_domain("pay-pal.com"));
    assert!(!is_valid_domain("example"));
    assert!(!is_valid_domain("-bad.com"));
    assert!(!is_valid_domain("bad-.com"));
    assert!(!is_valid_domain("a.b-c.com"));
    assert!(!is_valid_domain("example.c"));
    assert!(!is_valid_domain("example.com."));
    assert!(!is_valid_domain("192.168.0.1"));
    assert!(!is_valid_domain("example.com:8080"));
    assert!(!is_valid_domain(&format!("{}.com", "a".repeat(64))));
  }

  #[test]
  fn invalid_domain_is_rejected() {
    let err = extract(&normalize("http://192.168.0.1").unwrap()).unwrap_err();
    assert!(matches!(err, CheckError::InvalidUrl { ref reason, .. } if reason == "Invalid domain format"));

    let err = extract(&normalize("https://example.com:8443/").unwrap()).unwrap_err();
    assert!(matches!(err, CheckError::InvalidUrl { .. }));
  }

  #[test]
  fn short_https_url_is_mostly_legitimate() {
    let f = features("https://example.com");
    assert_eq!(f.url_length, Signal::Legitimate);
    assert_eq!(f.ssl_state, Signal::Legitimate);
    assert_eq!(f.sub_domain, Signal::Legitimate);
    assert_eq!(f.prefix_suffix, Signal::Legitimate);
    assert_eq!(f.double_slash_redirecting, Signal::Legitimate);
  }

  #[test]
  fn structural_signals() {
    let f = features("http://secure-pay.example.com/https//redirect?to=mailto:x");
    assert_eq!(f.ssl_state, Signal::Phishing);
    assert_eq!(f.prefix_suffix, Signal::Phishing);
    assert_eq!(f.sub_domain, Signal::Suspicious);
    assert_eq!(f.https_token, Signal::Phishing);
    assert_eq!(f.double_slash_redirecting, Signal::Phishing);
    assert_eq!(f.submitting_to_email, Signal::Phishing);
  }

  #[test]
  fn url_length_bands() {
    let base = "https://example.com/";
    let pad = |n: usize| format!("{base}{}", "a".repeat(n - base.len()));
    assert_eq!(features(&pad(53)).url_length, Signal::Legitimate);
    assert_eq!(features(&pad(54)).url_length, Signal::Suspicious);
    assert_eq!(features(&pad(75)).url_length, Signal::Suspicious);
    assert_eq!(features(&pad(76)).url_length, Signal::Phishing);
  }

  #[test]
  fn shortener_and_deep_subdomains() {
    let f = features("https://bit.ly/abc");
    assert_eq!(f.shortening_service, Signal::Phishing);

    let f = features("https://a.bb.cc.example.com");
    assert_eq!(f.sub_domain, Signal::Phishing);
  }

  #[test]
  fn serializes_with_model_column_names() {
    let v = serde_json::to_value(features("http://example.com")).unwrap();
    assert_eq!(v["SSLfinal_State"], -1);
    assert_eq!(v["URL_Length"], 1);
    assert_eq!(v["having_IP_Address"], 1);
    assert_eq!(v.as_object().unwrap().len(), 11);
  }
}
