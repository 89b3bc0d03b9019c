use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use duewatch_shared::DashboardConfig;
use tracing::{
  debug,
  info,
  warn
};

const CONFIG_ENV_VAR: &str =
  "DUEWATCH_CONFIG";
const ENDPOINT_ENV_VAR: &str =
  "DUEWATCH_ENDPOINT";
const TIMEZONE_ENV_VAR: &str =
  "DUEWATCH_TIMEZONE";
const CONFIG_DIR_NAME: &str = "duewatch";
const CONFIG_FILE_NAME: &str =
  "config.toml";

/// Values given on the command line; they
/// win over the environment and the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub endpoint:            Option<String>,
  pub timezone:            Option<String>,
  pub refresh_interval_ms: Option<u64>
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
  pub dashboard:   DashboardConfig,
  pub loaded_file: Option<PathBuf>
}

#[tracing::instrument(skip(overrides))]
pub fn load(
  config_override: Option<&Path>,
  overrides: &Overrides
) -> anyhow::Result<LoadedConfig> {
  let config_dir = dirs::config_dir();
  load_with_env(
    config_override,
    overrides,
    config_dir.as_deref(),
    |key| std::env::var(key).ok()
  )
}

/// `config_dir` is the platform config
/// directory searched last for
/// `duewatch/config.toml`; `None` skips
/// that lookup.
pub fn load_with_env<F>(
  config_override: Option<&Path>,
  overrides: &Overrides,
  config_dir: Option<&Path>,
  env: F
) -> anyhow::Result<LoadedConfig>
where
  F: Fn(&str) -> Option<String>
{
  let path = resolve_config_path(
    config_override,
    config_dir,
    &env
  )?;

  let mut dashboard = match &path {
    | Some(path) => {
      info!(config = %path.display(), "loading dashboard config");
      load_file(path)?
    }
    | None => {
      debug!(
        "no config file found; using \
         defaults"
      );
      DashboardConfig::default()
    }
  };

  apply_env(&mut dashboard, &env);
  apply_overrides(
    &mut dashboard,
    overrides
  );
  dashboard.validate();

  debug!(
    endpoint = %dashboard.endpoint,
    refresh_ms = dashboard.refresh_interval_ms,
    "resolved dashboard config"
  );

  Ok(LoadedConfig {
    dashboard,
    loaded_file: path
  })
}

fn load_file(
  path: &Path
) -> anyhow::Result<DashboardConfig> {
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;

  toml::from_str::<DashboardConfig>(
    &text
  )
  .with_context(|| {
    format!(
      "failed to parse {}",
      path.display()
    )
  })
}

fn apply_env<F>(
  cfg: &mut DashboardConfig,
  env: &F
) where
  F: Fn(&str) -> Option<String>
{
  if let Some(endpoint) =
    non_empty(env(ENDPOINT_ENV_VAR))
  {
    debug!(endpoint = %endpoint, "endpoint from environment");
    cfg.endpoint = endpoint;
  }
  if let Some(timezone) =
    non_empty(env(TIMEZONE_ENV_VAR))
  {
    debug!(timezone = %timezone, "timezone from environment");
    cfg.timezone = Some(timezone);
  }
}

fn apply_overrides(
  cfg: &mut DashboardConfig,
  overrides: &Overrides
) {
  if let Some(endpoint) =
    non_empty(overrides.endpoint.clone())
  {
    cfg.endpoint = endpoint;
  }
  if let Some(timezone) =
    non_empty(overrides.timezone.clone())
  {
    cfg.timezone = Some(timezone);
  }
  if let Some(ms) =
    overrides.refresh_interval_ms
  {
    cfg.refresh_interval_ms = ms;
  }
}

fn resolve_config_path<F>(
  override_path: Option<&Path>,
  config_dir: Option<&Path>,
  env: &F
) -> anyhow::Result<Option<PathBuf>>
where
  F: Fn(&str) -> Option<String>
{
  if let Some(path) = override_path {
    let path = expand_tilde(path);
    if !path.exists() {
      return Err(anyhow!(
        "config file {} does not \
         exist",
        path.display()
      ));
    }
    return Ok(Some(path));
  }

  if let Some(raw) =
    non_empty(env(CONFIG_ENV_VAR))
  {
    let path =
      expand_tilde(Path::new(&raw));
    if path.exists() {
      return Ok(Some(path));
    }
    warn!(
      config = %path.display(),
      "{CONFIG_ENV_VAR} points at a missing file; ignoring"
    );
  }

  let candidate =
    config_dir.map(|dir| {
      dir
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
    });
  Ok(candidate.filter(|path| {
    path.exists()
  }))
}

fn non_empty(
  value: Option<String>
) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
