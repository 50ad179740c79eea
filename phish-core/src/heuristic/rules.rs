use crate::normalize::NormalizedUrl;
use std::net::Ipv4Addr;

// Substrings that only show up in impersonation hosts or lure paths.
pub const DEFAULT_TOKENS: &[&str] = &[
  "paypal-secure",
  "amazon-login",
  "bank-secure",
  "urgent-action",
  "verify-account",
  "account-verify",
  "secure-login",
  "login-secure",
  "update-billing",
  "account-suspended",
  "apple-id-verify",
  "microsoft-support",
  "wallet-connect",
  "confirm-identity",
];

#[derive(Debug, Clone, Copy)]
pub struct PredicateMeta {
  pub id: &'static str,
  pub label: &'static str,
}

pub const H001: PredicateMeta = PredicateMeta {
  id: "H001",
  label: "Contains suspicious hyphens in domain",
};
pub const H002: PredicateMeta = PredicateMeta {
  id: "H002",
  label: "Uses insecure HTTP protocol",
};
pub const H003: PredicateMeta = PredicateMeta {
  id: "H003",
  label: "Unusually long domain name",
};
pub const H004: PredicateMeta = PredicateMeta {
  id: "H004",
  label: "Uses IP address instead of domain name",
};

/// Structural checks on a normalized URL. Each one that fires contributes one risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskPredicate {
  HyphenInHost,
  InsecureScheme,
  LongHost,
  Ipv4Host,
}

impl RiskPredicate {
  /// Evaluation order; risk factors are reported in this order.
  pub const ALL: [RiskPredicate; 4] = [
    RiskPredicate::HyphenInHost,
    RiskPredicate::InsecureScheme,
    RiskPredicate::LongHost,
    RiskPredicate::Ipv4Host,
  ];

  pub fn meta(&self) -> PredicateMeta {
    match self {
      RiskPredicate::HyphenInHost => H001,
      RiskPredicate::InsecureScheme => H002,
      RiskPredicate::LongHost => H003,
      RiskPredicate::Ipv4Host => H004,
    }
  }

  pub fn holds(&self, url: &NormalizedUrl, host: &str, max_host_length: usize) -> bool {
    match self {
      RiskPredicate::HyphenInHost => host.contains('-'),
      RiskPredicate::InsecureScheme => url.is_insecure(),
      RiskPredicate::LongHost => host.chars().count() > max_host_length,
      RiskPredicate::Ipv4Host => is_dotted_quad(host),
    }
  }
}

pub fn is_dotted_quad(host: &str) -> bool {
  host.parse::<Ipv4Addr>().is_ok()
}

pub fn first_matching_token<'a>(tokens: &'a [String], haystacks: &[&str]) -> Option<&'a str> {
  tokens
    .iter()
    .map(|t| t.trim())
    .filter(|t| !t.is_empty())
    .find(|t| {
      let t = t.to_ascii_lowercase();
      haystacks.iter().any(|h| h.contains(&t))
    })
}
