use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
  pub url: String,
}

/// Reply from the scoring service. Success carries `isPhishing` and the echoed `url`;
/// rejections carry only `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictReply {
  #[serde(default, rename = "isPhishing")]
  pub is_phishing: Option<bool>,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub prediction: Option<i64>,
  #[serde(default)]
  pub error: Option<String>,
}
