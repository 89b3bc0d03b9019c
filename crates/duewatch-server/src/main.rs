mod export;
mod page;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info,
  warn
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
  EnvFilter,
  fmt
};

use crate::export::ExportCommand;

#[derive(Parser, Debug)]
#[command(
  name = "duewatch-server",
  version,
  about = "Serves TaskWarrior's pending tasks over HTTP"
)]
struct Args {
  #[arg(long, default_value = "127.0.0.1:8000")]
  bind: SocketAddr,

  /// TaskWarrior binary used for `status:pending export`.
  #[arg(long, default_value = "task")]
  task_bin: PathBuf,

  #[arg(long, default_value_t = 5)]
  timeout_secs: u64,

  /// Also write a daily rolling log file into this directory.
  #[arg(long)]
  log_dir: Option<PathBuf>
}

fn init_tracing(
  log_dir: Option<&PathBuf>
) -> Option<WorkerGuard> {
  let filter =
    EnvFilter::try_from_default_env()
      .or_else(|_| {
        EnvFilter::try_new(
          "info,duewatch_server=debug,\
           duewatch_core=debug"
        )
      })
      .unwrap_or_else(|_| {
        EnvFilter::new("info")
      });

  let (file_layer, guard) = match log_dir
  {
    | Some(dir) => {
      let appender =
        tracing_appender::rolling::daily(
          dir,
          "duewatch-server.log"
        );
      let (writer, guard) =
        tracing_appender::non_blocking(
          appender
        );
      (
        Some(
          fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
        ),
        Some(guard)
      )
    }
    | None => (None, None)
  };

  let init_result =
    tracing_subscriber::registry()
      .with(filter)
      .with(
        fmt::layer()
          .with_target(true)
          .with_line_number(true)
      )
      .with(file_layer)
      .try_init();

  if let Err(err) = init_result {
    debug!(
      error = %err,
      "tracing subscriber already set, continuing"
    );
  }

  guard
}

async fn shutdown_signal() {
  if let Err(err) =
    tokio::signal::ctrl_c().await
  {
    warn!(error = %err, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  let _guard =
    init_tracing(args.log_dir.as_ref());

  let export = ExportCommand {
    program: args.task_bin,
    timeout: Duration::from_secs(
      args.timeout_secs
    ),
    ..ExportCommand::default()
  };
  info!(
    program = %export.program.display(),
    timeout_secs = args.timeout_secs,
    "configured task export"
  );

  let app = routes::router(
    routes::AppState::new(export)
  );

  let listener =
    tokio::net::TcpListener::bind(
      args.bind
    )
    .await
    .with_context(|| {
      format!(
        "failed to bind {}",
        args.bind
      )
    })?;
  info!("listening on http://{}", args.bind);

  axum::serve(listener, app)
    .with_graceful_shutdown(
      shutdown_signal()
    )
    .await
    .context("server error")?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::init_tracing;

  #[test]
  fn repeated_tracing_init_is_tolerated() {
    assert!(init_tracing(None).is_none());
    assert!(init_tracing(None).is_none());
  }
}
