use thiserror::Error;
use tracing::{
  debug,
  error,
  info
};

use crate::config::DashboardConfig;
use crate::task::{
  Task,
  TaskError,
  WireTask
};

pub const TASK_LIST_ID: &str =
  "task-list";
pub const THEME_TOGGLE_ID: &str =
  "theme-toggle";

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct FetchResponse {
  pub status: u16,
  pub body:   String
}

impl FetchResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

#[derive(Debug, Error)]
pub enum DashboardError {
  #[error(
    "request to {endpoint} failed: \
     {message}"
  )]
  Transport {
    endpoint: String,
    message:  String
  },
  #[error(
    "task feed answered with HTTP \
     {status}"
  )]
  Status { status: u16 },
  #[error(
    "task feed payload is malformed: \
     {0}"
  )]
  Payload(#[from] serde_json::Error),
  #[error(transparent)]
  Task(#[from] TaskError),
  #[error(
    "mount point #{0} is missing"
  )]
  MissingMountPoint(String)
}

/// Receives tasks in display order.
pub trait TaskContainer {
  fn append(&mut self, task: Task);
}

impl TaskContainer for Vec<Task> {
  fn append(&mut self, task: Task) {
    self.push(task);
  }
}

/// Blocking notification shown to the
/// viewer when a load fails.
pub trait Notifier {
  fn notify(&mut self, message: &str);
}

pub trait TaskSource {
  fn fetch(
    &self,
    endpoint: &str
  ) -> Result<FetchResponse, DashboardError>;
}

/// Highest urgency first. The sort is
/// stable, so equal urgencies keep feed
/// order.
pub fn sort_by_urgency(
  tasks: &mut [Task]
) {
  tasks.sort_by(|a, b| {
    b.urgency.total_cmp(&a.urgency)
  });
}

#[derive(Debug, Clone)]
pub struct TaskListController {
  config: DashboardConfig
}

impl TaskListController {
  pub fn new(
    config: DashboardConfig
  ) -> Self {
    Self { config }
  }

  pub fn endpoint(&self) -> &str {
    &self.config.endpoint
  }

  #[tracing::instrument(
    skip(self, fetched),
    fields(endpoint = %self.config.endpoint)
  )]
  pub fn prepare(
    &self,
    fetched: Result<
      FetchResponse,
      DashboardError
    >
  ) -> Result<Vec<Task>, DashboardError>
  {
    let response = fetched?;
    if !response.is_success() {
      return Err(
        DashboardError::Status {
          status: response.status
        }
      );
    }

    let records: Vec<WireTask> =
      serde_json::from_str(
        &response.body
      )?;
    debug!(
      count = records.len(),
      "decoded task feed"
    );

    let mut tasks = records
      .into_iter()
      .map(Task::from_wire)
      .collect::<Result<Vec<_>, _>>()?;
    sort_by_urgency(&mut tasks);
    Ok(tasks)
  }

  /// Appends every task in urgency order,
  /// or nothing at all. Any failure is
  /// logged and reported to the notifier
  /// exactly once.
  pub fn mount(
    &self,
    fetched: Result<
      FetchResponse,
      DashboardError
    >,
    container: Option<
      &mut dyn TaskContainer
    >,
    notifier: &mut dyn Notifier
  ) -> Result<usize, DashboardError> {
    let result = match container {
      | None => Err(
        DashboardError::MissingMountPoint(
          TASK_LIST_ID.to_string()
        )
      ),
      | Some(container) => {
        self.prepare(fetched).map(
          |tasks| {
            let count = tasks.len();
            for task in tasks {
              container.append(task);
            }
            count
          }
        )
      }
    };

    match &result {
      | Ok(count) => {
        info!(
          count,
          endpoint = %self.config.endpoint,
          "mounted task list"
        );
      }
      | Err(err) => {
        error!(
          error = %err,
          endpoint = %self.config.endpoint,
          "failed to load task list"
        );
        notifier.notify(&format!(
          "Could not load tasks: {err}"
        ));
      }
    }

    result
  }

  pub fn load<S>(
    &self,
    source: &S,
    container: Option<
      &mut dyn TaskContainer
    >,
    notifier: &mut dyn Notifier
  ) -> Result<usize, DashboardError>
  where
    S: TaskSource + ?Sized
  {
    let fetched = source
      .fetch(&self.config.endpoint);
    self.mount(
      fetched, container, notifier
    )
  }
}
