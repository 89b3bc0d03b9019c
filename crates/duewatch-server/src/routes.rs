use std::sync::Arc;

use axum::extract::State;
use axum::http::{
  HeaderValue,
  header
};
use axum::response::{
  Html,
  Response
};
use axum::routing::get;
use axum::{
  Json,
  Router,
  middleware
};
use chrono::Utc;
use duewatch_core::report::{
  self,
  ImprovedTask
};
use serde_json::Value;
use tracing::instrument;

use crate::export::{
  ExportCommand,
  ExportError,
  to_raw_tasks
};
use crate::page::render_report;

#[derive(Debug, Clone)]
pub struct AppState {
  pub export: Arc<ExportCommand>
}

impl AppState {
  pub fn new(
    export: ExportCommand
  ) -> Self {
    Self {
      export: Arc::new(export)
    }
  }
}

pub fn router(
  state: AppState
) -> Router {
  Router::new()
    .route("/tasks", get(raw_tasks))
    .route(
      "/gpt/tasks",
      get(improved_tasks)
    )
    .route(
      "/gpt/html/tasks",
      get(improved_tasks_html)
    )
    .with_state(state)
    .layer(middleware::map_response(
      allow_any_origin
    ))
}

async fn allow_any_origin(
  mut response: Response
) -> Response {
  response.headers_mut().insert(
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderValue::from_static("*")
  );
  response
}

#[instrument(skip_all)]
pub async fn raw_tasks(
  State(state): State<AppState>
) -> Result<Json<Vec<Value>>, ExportError>
{
  let records = state.export.run().await?;
  Ok(Json(records))
}

async fn load_improved(
  state: &AppState
) -> Result<Vec<ImprovedTask>, ExportError>
{
  let records = state.export.run().await?;
  let raw = to_raw_tasks(records)?;
  Ok(report::improve_all(
    raw,
    Utc::now()
  )?)
}

#[instrument(skip_all)]
pub async fn improved_tasks(
  State(state): State<AppState>
) -> Result<
  Json<Vec<ImprovedTask>>,
  ExportError
> {
  load_improved(&state).await.map(Json)
}

#[instrument(skip_all)]
pub async fn improved_tasks_html(
  State(state): State<AppState>
) -> Result<Html<String>, ExportError> {
  let mut tasks =
    load_improved(&state).await?;
  report::sort_by_urgency(&mut tasks);
  Ok(Html(render_report(&tasks)))
}
