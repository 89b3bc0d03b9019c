use duewatch_shared::{DashboardError, FetchResponse};
use gloo::net::http::Request;

pub async fn fetch_tasks(endpoint: &str) -> Result<FetchResponse, DashboardError> {
    let transport = |message: String| DashboardError::Transport {
        endpoint: endpoint.to_string(),
        message,
    };

    let response = Request::get(endpoint)
        .send()
        .await
        .map_err(|e| transport(format!("fetch error: {e}")))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport(format!("body read error: {e}")))?;

    Ok(FetchResponse { status, body })
}
