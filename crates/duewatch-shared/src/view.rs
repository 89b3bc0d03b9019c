use std::fmt;

use chrono::{
  DateTime,
  TimeZone,
  Utc
};

use crate::countdown::{
  Countdown,
  Tone
};
use crate::datetime::format_human;
use crate::task::Task;

#[derive(Debug, Clone, PartialEq)]
pub struct CountdownView {
  pub title: &'static str,
  pub text:  String,
  pub tone:  Tone
}

impl CountdownView {
  pub fn at(
    due: DateTime<Utc>,
    now: DateTime<Utc>
  ) -> Self {
    let countdown =
      Countdown::compute(due, now);
    Self {
      title: countdown.title(),
      text:  countdown.text(),
      tone:  countdown.tone
    }
  }
}

/// Everything a frontend needs to draw
/// one task, computed for a single
/// instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
  pub description: String,
  pub project:     String,
  pub status:      String,
  pub urgency:     String,
  pub priority:    Option<&'static str>,
  pub due_label:   Option<String>,
  pub countdown:   Option<CountdownView>
}

impl TaskCard {
  pub fn build<Z>(
    task: &Task,
    now: DateTime<Utc>,
    tz: &Z
  ) -> Self
  where
    Z: TimeZone,
    Z::Offset: fmt::Display
  {
    Self {
      description: task
        .description
        .clone(),
      project:     task.project.clone(),
      status:      task.status.clone(),
      urgency:     format_urgency(
        task.urgency
      ),
      priority:    task
        .priority
        .map(|p| p.label()),
      due_label:   task
        .due
        .map(|due| format_human(due, tz)),
      countdown:   task.due.map(|due| {
        CountdownView::at(due, now)
      })
    }
  }
}

/// Stable identity for a card in a
/// rendered list. Descriptions repeat,
/// so records without a uuid fall back to
/// their position.
pub fn list_key(
  task: &Task,
  index: usize
) -> String {
  match task.uuid {
    | Some(uuid) => uuid.to_string(),
    | None => format!("#{index}")
  }
}

pub fn format_urgency(
  urgency: f64
) -> String {
  format!("{urgency:.2}")
}
