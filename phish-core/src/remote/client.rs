use crate::config::{validate_remote_config, RemoteConfig};
use crate::error::CheckError;
use anyhow::Context;
use reqwest::blocking::{Client, Response};
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use reqwest::Url;
use std::io::Read;
use std::time::Duration;

use super::schema::{PredictReply, PredictRequest};

const MAX_REPLY_BYTES: usize = 64 * 1024;

pub struct PredictClient {
  client: Client,
  endpoint: Url,
}

impl PredictClient {
  pub fn new(cfg: &RemoteConfig) -> anyhow::Result<Self> {
    if let Some(reason) = validate_remote_config(cfg) {
      anyhow::bail!("invalid remote scorer config: {reason}");
    }
    let endpoint =
      Url::parse(&cfg.endpoint).with_context(|| format!("invalid endpoint: {}", cfg.endpoint))?;

    let client = Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_seconds))
      .redirect(Policy::none())
      .build()
      .context("build HTTP client")?;

    Ok(Self { client, endpoint })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  /// One POST exchange. Error bodies are still parsed so the service's `error` field
  /// survives non-2xx statuses.
  pub fn predict(&self, url: &str) -> Result<PredictReply, CheckError> {
    let response = self
      .client
      .post(self.endpoint.clone())
      .header(USER_AGENT, format!("phish-guard/{}", env!("CARGO_PKG_VERSION")))
      .json(&PredictRequest {
        url: url.to_string(),
      })
      .send()
      .map_err(|e| {
        CheckError::Transport(format!("POST {}: {e}", safe_url_label(&self.endpoint)))
      })?;

    let status = response.status();
    let body = read_response_with_limit(response, MAX_REPLY_BYTES)?;

    let reply = match serde_json::from_slice::<PredictReply>(&body) {
      Ok(r) => r,
      Err(e) if status.is_success() => {
        return Err(CheckError::Transport(format!("malformed reply: {e}")));
      }
      Err(_) => {
        return Err(CheckError::Transport(format!(
          "unexpected HTTP status {} for {}",
          status.as_u16(),
          safe_url_label(&self.endpoint)
        )));
      }
    };

    if !status.is_success() && reply.error.is_none() {
      return Err(CheckError::Remote(format!(
        "HTTP status {} without error detail",
        status.as_u16()
      )));
    }

    Ok(reply)
  }
}

fn read_response_with_limit(response: Response, max_bytes: usize) -> Result<Vec<u8>, CheckError> {
  let mut out = Vec::new();
  let mut limited = response.take((max_bytes.saturating_add(1)) as u64);
  limited
    .read_to_end(&mut out)
    .map_err(|e| CheckError::Transport(format!("read response body: {e}")))?;

  if out.len() > max_bytes {
    return Err(CheckError::Transport(format!(
      "response exceeds max size {max_bytes} bytes"
    )));
  }

  Ok(out)
}

fn safe_url_label(url: &Url) -> String {
  let host = url.host_str().unwrap_or("<no-host>");
  let mut path = url.path().to_string();
  if path.is_empty() {
    path = "/".to_string();
  }
  match url.port() {
    Some(port) => format!("{host}:{port}{path}"),
    None => format!("{host}{path}"),
  }
}
