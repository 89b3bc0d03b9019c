mod api;
mod app;
mod components;
mod dom;

use duewatch_shared::dashboard::TASK_LIST_ID;
use duewatch_shared::{
  DashboardConfig,
  DashboardError,
  Notifier
};

use crate::dom::AlertNotifier;

fn build_config() -> DashboardConfig {
  let mut config = DashboardConfig {
    timezone: option_env!(
      "DUEWATCH_TIMEZONE"
    )
    .map(str::to_string),
    ..DashboardConfig::default()
  };
  if let Some(endpoint) =
    option_env!("DUEWATCH_ENDPOINT")
  {
    config.endpoint = endpoint.to_string();
  }
  config.validate();
  config
}

fn report(err: &DashboardError) {
  tracing::error!(error = %err, "dashboard setup failed");
  AlertNotifier.notify(&format!(
    "Could not start dashboard: {err}"
  ));
}

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  let config = build_config();
  tracing::info!(
    endpoint = %config.endpoint,
    "starting duewatch frontend"
  );

  dom::theme_store(
    &config.theme_storage_key
  )
  .restore();
  if let Err(err) = dom::bind_theme_toggle(
    config.theme_storage_key.clone()
  ) {
    report(&err);
  }

  let Some(mount) =
    dom::element_by_id(TASK_LIST_ID)
  else {
    report(
      &DashboardError::MissingMountPoint(
        TASK_LIST_ID.to_string()
      )
    );
    return;
  };

  yew::Renderer::<app::App>::with_root_and_props(
    mount,
    app::AppProps { config }
  )
  .render();
}
