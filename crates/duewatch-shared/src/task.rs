use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use thiserror::Error;
use uuid::Uuid;

use crate::datetime::{
  DateFormatError,
  parse_compact
};

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
  High,
  Medium,
  Low
}

impl Priority {
  /// TaskWarrior exports `H`, `M` and
  /// `L`; anything else means unset.
  pub fn from_code(
    code: &str
  ) -> Option<Self> {
    match code.trim() {
      | "H" => Some(Self::High),
      | "M" => Some(Self::Medium),
      | "L" => Some(Self::Low),
      | _ => None
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::High => "HIGH",
      | Self::Medium => "MEDIUM",
      | Self::Low => "LOW"
    }
  }
}

/// One record of the task feed, as
/// produced by `task export`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct WireTask {
  pub description: String,
  #[serde(default)]
  pub due:         Option<String>,
  #[serde(default)]
  pub project:     Option<String>,
  pub status:      String,
  pub urgency:     f64,
  #[serde(default)]
  pub uuid:        Option<Uuid>,
  #[serde(default)]
  pub id:          Option<u64>,
  #[serde(default)]
  pub priority:    Option<String>,
  #[serde(default)]
  pub tags:        Vec<String>
}

#[derive(Debug, Error)]
#[error(
  "task {description:?} has an invalid \
   due date"
)]
pub struct TaskError {
  pub description: String,
  #[source]
  pub source:      DateFormatError
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
  pub description: String,
  pub due:         Option<DateTime<Utc>>,
  pub project:     String,
  pub status:      String,
  pub urgency:     f64,
  pub uuid:        Option<Uuid>,
  pub id:          Option<u64>,
  pub priority:    Option<Priority>,
  pub tags:        Vec<String>
}

impl Task {
  pub fn from_wire(
    record: WireTask
  ) -> Result<Self, TaskError> {
    let due = match record
      .due
      .as_deref()
      .map(str::trim)
    {
      | None | Some("") => None,
      | Some(raw) => {
        Some(parse_compact(raw).map_err(
          |source| TaskError {
            description: record
              .description
              .clone(),
            source
          }
        )?)
      }
    };

    let priority = record
      .priority
      .as_deref()
      .and_then(Priority::from_code);

    Ok(Self {
      description: record.description,
      due,
      project: record
        .project
        .unwrap_or_default(),
      status: record.status,
      urgency: record.urgency,
      uuid: record.uuid,
      id: record.id,
      priority,
      tags: record.tags
    })
  }
}
