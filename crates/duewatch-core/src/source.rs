use std::time::Duration;

use anyhow::Context;
use duewatch_shared::{
  DashboardConfig,
  DashboardError,
  FetchResponse,
  TaskSource
};
use reqwest::blocking::Client;
use tracing::debug;

/// Reads the task feed over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client: Client
}

impl HttpSource {
  pub fn new(
    cfg: &DashboardConfig
  ) -> anyhow::Result<Self> {
    let mut builder = Client::builder()
      .user_agent(concat!(
        "duewatch/",
        env!("CARGO_PKG_VERSION")
      ));
    if let Some(secs) =
      cfg.request_timeout_secs
    {
      builder = builder
        .timeout(Duration::from_secs(secs));
    }

    let client = builder
      .build()
      .context(
        "failed to build HTTP client"
      )?;
    Ok(Self { client })
  }
}

impl TaskSource for HttpSource {
  #[tracing::instrument(skip(self))]
  fn fetch(
    &self,
    endpoint: &str
  ) -> Result<FetchResponse, DashboardError>
  {
    let transport = |err: reqwest::Error| {
      DashboardError::Transport {
        endpoint: endpoint.to_string(),
        message:  err.to_string()
      }
    };

    let response = self
      .client
      .get(endpoint)
      .send()
      .map_err(transport)?;
    let status = response.status().as_u16();
    let body =
      response.text().map_err(transport)?;

    debug!(
      status,
      bytes = body.len(),
      "fetched task feed"
    );
    Ok(FetchResponse { status, body })
  }
}
