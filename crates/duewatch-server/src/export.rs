use std::path::PathBuf;
use std::process::{
  ExitStatus,
  Stdio
};
use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{
  IntoResponse,
  Response
};
use duewatch_core::report::RawTask;
use duewatch_shared::datetime::DateFormatError;
use serde_json::{
  Value,
  json
};
use thiserror::Error;
use tokio::process::Command;
use tracing::{
  debug,
  error,
  instrument
};

pub const DEFAULT_EXPORT_TIMEOUT:
  Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("`task export` timed out")]
  TimedOut,
  #[error(
    "failed to run {program}: {source}"
  )]
  Spawn {
    program: String,
    #[source]
    source:  std::io::Error
  },
  #[error("`task export` crashed: {0}")]
  Crashed(String),
  #[error(
    "`task export` failed rc={code}: \
     {stderr}"
  )]
  Failed { code: i32, stderr: String },
  #[error(
    "`task export` generated invalid JSON"
  )]
  InvalidJson(#[source] serde_json::Error),
  #[error(
    "`task export` produced unexpected \
     JSON shape"
  )]
  UnexpectedShape,
  #[error(transparent)]
  Date(#[from] DateFormatError)
}

impl ExportError {
  pub fn status(&self) -> StatusCode {
    match self {
      | Self::TimedOut => {
        StatusCode::GATEWAY_TIMEOUT
      }
      | _ => StatusCode::BAD_GATEWAY
    }
  }
}

impl IntoResponse for ExportError {
  fn into_response(self) -> Response {
    error!(error = %self, "task export request failed");
    (
      self.status(),
      Json(json!({ "detail": self.to_string() }))
    )
      .into_response()
  }
}

/// How to invoke TaskWarrior's export.
#[derive(Debug, Clone)]
pub struct ExportCommand {
  pub program: PathBuf,
  pub args:    Vec<String>,
  pub timeout: Duration
}

impl Default for ExportCommand {
  fn default() -> Self {
    Self {
      program: PathBuf::from("task"),
      args:    vec![
        "status:pending".to_string(),
        "export".to_string(),
      ],
      timeout: DEFAULT_EXPORT_TIMEOUT
    }
  }
}

impl ExportCommand {
  /// Runs the export and returns its
  /// records, each checked to be a JSON
  /// object.
  #[instrument(skip(self), fields(program = %self.program.display()))]
  pub async fn run(
    &self
  ) -> Result<Vec<Value>, ExportError> {
    let mut command =
      Command::new(&self.program);
    command
      .args(&self.args)
      .stdin(Stdio::null())
      .kill_on_drop(true);

    let output = tokio::time::timeout(
      self.timeout,
      command.output()
    )
    .await
    .map_err(|_| ExportError::TimedOut)?
    .map_err(|source| {
      ExportError::Spawn {
        program: self
          .program
          .display()
          .to_string(),
        source
      }
    })?;

    check_exit(
      output.status,
      &output.stderr
    )?;

    let records = decode_records(
      &output.stdout
    )?;
    debug!(
      count = records.len(),
      "task export succeeded"
    );
    Ok(records)
  }
}

fn check_exit(
  status: ExitStatus,
  stderr: &[u8]
) -> Result<(), ExportError> {
  match status.code() {
    | Some(0) => Ok(()),
    | Some(code) => {
      Err(ExportError::Failed {
        code,
        stderr: String::from_utf8_lossy(
          stderr
        )
        .trim()
        .to_string()
      })
    }
    | None => {
      Err(ExportError::Crashed(
        describe_signal(status)
      ))
    }
  }
}

#[cfg(unix)]
fn describe_signal(
  status: ExitStatus
) -> String {
  use std::os::unix::process::ExitStatusExt;

  match status.signal() {
    | Some(signal) => {
      format!("signal {signal}")
    }
    | None => "unknown signal".to_string()
  }
}

#[cfg(not(unix))]
fn describe_signal(
  _status: ExitStatus
) -> String {
  "terminated abnormally".to_string()
}

pub fn decode_records(
  stdout: &[u8]
) -> Result<Vec<Value>, ExportError> {
  let parsed: Value =
    serde_json::from_slice(stdout)
      .map_err(ExportError::InvalidJson)?;

  match parsed {
    | Value::Array(items)
      if items
        .iter()
        .all(Value::is_object) =>
    {
      Ok(items)
    }
    | _ => Err(ExportError::UnexpectedShape)
  }
}

pub fn to_raw_tasks(
  records: Vec<Value>
) -> Result<Vec<RawTask>, ExportError> {
  records
    .into_iter()
    .map(|record| {
      serde_json::from_value::<RawTask>(
        record
      )
      .map_err(|_| {
        ExportError::UnexpectedShape
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;
  use std::time::Duration;

  use axum::http::StatusCode;

  use super::{
    ExportCommand,
    ExportError,
    decode_records,
    to_raw_tasks
  };

  fn shell(script: &str) -> ExportCommand {
    ExportCommand {
      program: PathBuf::from("sh"),
      args:    vec![
        "-c".to_string(),
        script.to_string(),
      ],
      timeout: Duration::from_secs(5)
    }
  }

  #[test]
  fn decode_requires_array_of_objects() {
    assert!(
      decode_records(br#"[{"a": 1}]"#)
        .is_ok()
    );
    assert!(matches!(
      decode_records(br#"{"a": 1}"#),
      Err(ExportError::UnexpectedShape)
    ));
    assert!(matches!(
      decode_records(br#"[1, 2]"#),
      Err(ExportError::UnexpectedShape)
    ));
    assert!(matches!(
      decode_records(b"not json"),
      Err(ExportError::InvalidJson(_))
    ));
  }

  #[test]
  fn mistyped_fields_are_a_shape_error() {
    let records = decode_records(
      br#"[{"urgency": "very"}]"#
    )
    .expect("array of objects");
    assert!(matches!(
      to_raw_tasks(records),
      Err(ExportError::UnexpectedShape)
    ));
  }

  #[test]
  fn timeout_maps_to_gateway_timeout() {
    assert_eq!(
      ExportError::TimedOut.status(),
      StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
      ExportError::UnexpectedShape
        .status(),
      StatusCode::BAD_GATEWAY
    );
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn runs_export_command() {
    let records = shell(
      r#"printf '[{"description":"a","urgency":1.5}]'"#
    )
    .run()
    .await
    .expect("export succeeds");
    assert_eq!(records.len(), 1);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn non_zero_exit_carries_stderr() {
    let err = shell("echo broken >&2; exit 3")
      .run()
      .await
      .expect_err("export fails");
    match err {
      | ExportError::Failed {
        code,
        stderr
      } => {
        assert_eq!(code, 3);
        assert_eq!(stderr, "broken");
      }
      | other => {
        panic!("unexpected error: {other}")
      }
    }
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn crash_is_reported() {
    let err = shell("kill -9 $$")
      .run()
      .await
      .expect_err("export crashes");
    assert!(matches!(
      err,
      ExportError::Crashed(ref what)
        if what == "signal 9"
    ));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn slow_export_times_out() {
    let mut command = shell("sleep 5");
    command.timeout =
      Duration::from_millis(100);
    assert!(matches!(
      command.run().await,
      Err(ExportError::TimedOut)
    ));
  }

  #[tokio::test]
  async fn missing_binary_is_a_spawn_error() {
    let command = ExportCommand {
      program: PathBuf::from(
        "duewatch-no-such-binary"
      ),
      ..ExportCommand::default()
    };
    assert!(matches!(
      command.run().await,
      Err(ExportError::Spawn { .. })
    ));
  }
}
