use phish_core::features::UrlFeatures;
use phish_core::{CheckSession, ScoreResult};
use serde_json::json;

pub fn session(s: &CheckSession, as_json: bool) -> String {
  if let Some(msg) = s.error() {
    return error_line(msg, as_json);
  }
  match s.result() {
    Some(r) if as_json => result_json(r),
    Some(r) => result_text(r),
    None => String::new(),
  }
}

pub fn error_line(message: &str, as_json: bool) -> String {
  if as_json {
    json!({ "error": message }).to_string()
  } else {
    format!("Error: {message}")
  }
}

pub fn result_json(r: &ScoreResult) -> String {
  serde_json::to_string(r).unwrap_or_else(|e| error_line(&e.to_string(), true))
}

pub fn result_text(r: &ScoreResult) -> String {
  let verdict = if r.is_phishing {
    "PHISHING SUSPECTED"
  } else {
    "looks safe"
  };
  let mut out = format!(
    "{}\n  Verdict:    {verdict}\n  Confidence: {}%",
    r.url, r.confidence
  );
  if !r.risk_factors.is_empty() {
    out.push_str("\n  Risk factors:");
    for f in &r.risk_factors {
      out.push_str(&format!("\n    - {f}"));
    }
  }
  out
}

pub fn features_text(url: &str, f: &UrlFeatures) -> String {
  let mut out = url.to_string();
  for (name, signal) in f.entries() {
    out.push_str(&format!("\n  {name:<26}{:>3}", i8::from(signal)));
  }
  out
}

pub fn features_json(url: &str, f: &UrlFeatures) -> String {
  json!({ "url": url, "features": f }).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use phish_core::error::INVALID_URL_MESSAGE;
  use phish_core::normalize;

  fn flagged() -> ScoreResult {
    ScoreResult {
      is_phishing: true,
      url: "http://192.168.0.1".to_string(),
      confidence: 91,
      risk_factors: vec!["Uses insecure HTTP protocol".to_string()],
    }
  }

  #[test]
  fn text_lists_risk_factors() {
    let out = result_text(&flagged());
    assert!(out.starts_with("http://192.168.0.1\n"));
    assert!(out.contains("PHISHING SUSPECTED"));
    assert!(out.contains("Confidence: 91%"));
    assert!(out.contains("    - Uses insecure HTTP protocol"));
  }

  #[test]
  fn safe_text_has_no_factor_section() {
    let mut r = flagged();
    r.is_phishing = false;
    r.risk_factors.clear();
    let out = result_text(&r);
    assert!(out.contains("looks safe"));
    assert!(!out.contains("Risk factors"));
  }

  #[test]
  fn json_uses_wire_field_names() {
    let v: serde_json::Value = serde_json::from_str(&result_json(&flagged())).unwrap();
    assert_eq!(v["isPhishing"], true);
    assert_eq!(v["riskFactors"].as_array().unwrap().len(), 1);
  }

  #[test]
  fn session_error_renders_single_line() {
    let mut s = CheckSession::new();
    s.set_input("not a url");
    let scorer = phish_core::heuristic::HeuristicScorer::new(&Default::default());
    s.submit(&scorer);

    let out = session(&s, false);
    assert_eq!(out, format!("Error: {INVALID_URL_MESSAGE}"));
    assert!(!out.contains('\n'));

    let v: serde_json::Value = serde_json::from_str(&session(&s, true)).unwrap();
    assert_eq!(v["error"], INVALID_URL_MESSAGE);
  }

  #[test]
  fn features_table_has_one_row_per_signal() {
    let url = normalize("https://example.com").unwrap();
    let f = phish_core::features::extract(&url).unwrap();
    let out = features_text(url.as_str(), &f);
    assert_eq!(out.lines().count(), 12);
    assert!(out.contains("SSLfinal_State"));

    let v: serde_json::Value = serde_json::from_str(&features_json(url.as_str(), &f)).unwrap();
    assert_eq!(v["features"]["SSLfinal_State"], 1);
  }
}
