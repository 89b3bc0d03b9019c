pub mod cli;
pub mod config;
pub mod render;
pub mod report;
pub mod source;

use std::ffi::OsString;
use std::io::{
  self,
  Write
};
use std::thread;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use duewatch_shared::{
  Notifier,
  Task,
  TaskListController
};
use tracing::{
  debug,
  info
};

/// Terminal stand-in for the browser's
/// blocking alert.
#[derive(Debug, Default)]
pub struct StderrNotifier {
  pub shown: usize
}

impl Notifier for StderrNotifier {
  fn notify(&mut self, message: &str) {
    self.shown += 1;
    let mut err = io::stderr().lock();
    let _ = writeln!(err, "\x07!! {message}");
  }
}

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    watch = cli.watch,
    "starting duewatch"
  );

  let loaded = config::load(
    cli.config.as_deref(),
    &cli.overrides()
  )?;
  if let Some(path) = &loaded.loaded_file
  {
    debug!(config = %path.display(), "using config file");
  }

  let dashboard = loaded.dashboard;
  let tz = dashboard.viewer_timezone();
  let interval =
    dashboard.refresh_interval();

  let source =
    source::HttpSource::new(&dashboard)?;
  let controller =
    TaskListController::new(dashboard);

  let mut tasks: Vec<Task> = Vec::new();
  let mut notifier =
    StderrNotifier::default();
  controller
    .load(
      &source,
      Some(&mut tasks),
      &mut notifier
    )
    .with_context(|| {
      format!(
        "failed to load tasks from {}",
        controller.endpoint()
      )
    })?;

  let mut renderer =
    render::Renderer::new(!cli.no_color);

  if !cli.watch {
    renderer.print_dashboard(
      &tasks,
      Utc::now(),
      &tz,
      false
    )?;
    info!("done");
    return Ok(());
  }

  loop {
    renderer.print_dashboard(
      &tasks,
      Utc::now(),
      &tz,
      true
    )?;
    thread::sleep(interval);
  }
}
