pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod datetime;
pub mod task;
pub mod theme;
pub mod view;

pub use config::DashboardConfig;
pub use countdown::{
  Breakdown,
  Countdown,
  Direction,
  Tone
};
pub use dashboard::{
  DashboardError,
  FetchResponse,
  Notifier,
  TaskContainer,
  TaskListController,
  TaskSource
};
pub use task::{
  Priority,
  Task,
  WireTask
};
pub use view::{
  CountdownView,
  TaskCard,
  list_key
};
