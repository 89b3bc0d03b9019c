use std::time::Duration;

use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::warn;

use crate::datetime::resolve_timezone;
use crate::theme::DEFAULT_THEME_STORAGE_KEY;

pub const DEFAULT_ENDPOINT: &str =
  "http://127.0.0.1:8000/tasks";
const DEFAULT_REFRESH_INTERVAL_MS: u64 =
  1_000;
const MIN_REFRESH_INTERVAL_MS: u64 = 250;
const MAX_REFRESH_INTERVAL_MS: u64 =
  60_000;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct DashboardConfig {
  pub endpoint:             String,
  pub refresh_interval_ms:  u64,
  pub timezone:             Option<String>,
  pub theme_storage_key:    String,
  pub request_timeout_secs: Option<u64>
}

impl Default for DashboardConfig {
  fn default() -> Self {
    Self {
      endpoint:             DEFAULT_ENDPOINT
        .to_string(),
      refresh_interval_ms:
        DEFAULT_REFRESH_INTERVAL_MS,
      timezone:             None,
      theme_storage_key:
        DEFAULT_THEME_STORAGE_KEY
          .to_string(),
      request_timeout_secs: None
    }
  }
}

impl DashboardConfig {
  pub fn with_endpoint(
    endpoint: impl Into<String>
  ) -> Self {
    Self {
      endpoint: endpoint.into(),
      ..Self::default()
    }
  }

  pub fn validate(&mut self) {
    let trimmed =
      self.endpoint.trim().to_string();
    if trimmed.is_empty() {
      warn!(
        fallback = DEFAULT_ENDPOINT,
        "empty endpoint; using default"
      );
      self.endpoint =
        DEFAULT_ENDPOINT.to_string();
    } else {
      self.endpoint = trimmed;
    }

    let clamped = self
      .refresh_interval_ms
      .clamp(
        MIN_REFRESH_INTERVAL_MS,
        MAX_REFRESH_INTERVAL_MS
      );
    if clamped
      != self.refresh_interval_ms
    {
      warn!(
        requested = self.refresh_interval_ms,
        clamped,
        "refresh interval out of range"
      );
      self.refresh_interval_ms = clamped;
    }

    if self
      .theme_storage_key
      .trim()
      .is_empty()
    {
      self.theme_storage_key =
        DEFAULT_THEME_STORAGE_KEY
          .to_string();
    }
  }

  pub fn refresh_interval(
    &self
  ) -> Duration {
    Duration::from_millis(
      self.refresh_interval_ms
    )
  }

  pub fn viewer_timezone(&self) -> Tz {
    resolve_timezone(
      self.timezone.as_deref()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::{
    DEFAULT_ENDPOINT,
    DashboardConfig
  };

  #[test]
  fn partial_config_keeps_defaults() {
    let cfg: DashboardConfig =
      decode("{\"endpoint\": \"http://tasks.local/tasks\"}");
    assert_eq!(
      cfg.endpoint,
      "http://tasks.local/tasks"
    );
    assert_eq!(
      cfg.refresh_interval_ms,
      1_000
    );
    assert_eq!(
      cfg.theme_storage_key,
      "theme"
    );
  }

  #[test]
  fn validate_clamps_and_defaults() {
    let mut cfg = DashboardConfig {
      endpoint: "   ".to_string(),
      refresh_interval_ms: 5,
      theme_storage_key: String::new(),
      ..DashboardConfig::default()
    };
    cfg.validate();
    assert_eq!(
      cfg.endpoint,
      DEFAULT_ENDPOINT
    );
    assert_eq!(
      cfg.refresh_interval_ms,
      250
    );
    assert_eq!(
      cfg.theme_storage_key,
      "theme"
    );
  }

  fn decode(
    raw: &str
  ) -> DashboardConfig {
    serde_json::from_str(raw)
      .expect("decode config")
  }
}
