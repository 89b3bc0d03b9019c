//! The "improved" task representation served to downstream consumers:
//! normalized fields plus a days/hours/minutes distance to the due date.

use chrono::{DateTime, Utc};
use duewatch_shared::Priority;
use duewatch_shared::datetime::{DateFormatError, parse_compact};
use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// A record from `task export` where every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTask {
    pub id: Option<u64>,
    pub description: Option<String>,
    pub due: Option<String>,
    pub entry: Option<String>,
    pub modified: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
    pub status: Option<String>,
    pub uuid: Option<String>,
    pub urgency: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeDiff {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl TimeDiff {
    /// Absolute distance with fixed 24 hour days; seconds are dropped.
    pub fn between(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        let total = (a - b).num_seconds().abs();
        Self {
            days: total / SECONDS_PER_DAY,
            hours: total % SECONDS_PER_DAY / SECONDS_PER_HOUR,
            minutes: total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} days, {} hours, {} minutes",
            self.days, self.hours, self.minutes
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovedTask {
    pub description: String,
    pub status: String,
    pub priority: Option<Priority>,
    pub project: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub due_in: Option<TimeDiff>,
    pub overdue_by: Option<TimeDiff>,
    pub urgency: f64,
}

impl ImprovedTask {
    pub fn from_raw(raw: RawTask, now: DateTime<Utc>) -> Result<Self, DateFormatError> {
        let due = raw
            .due
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(parse_compact)
            .transpose()?;

        let (due_in, overdue_by) = match due {
            Some(due) if now > due => (None, Some(TimeDiff::between(now, due))),
            Some(due) => (Some(TimeDiff::between(now, due)), None),
            None => (None, None),
        };

        Ok(Self {
            description: raw.description.unwrap_or_default(),
            status: raw
                .status
                .filter(|status| !status.is_empty())
                .unwrap_or_else(|| "pending".to_string()),
            priority: raw.priority.as_deref().and_then(Priority::from_code),
            project: raw.project,
            due,
            due_in,
            overdue_by,
            urgency: raw.urgency.unwrap_or(0.0),
        })
    }

    /// Label/value pairs for the HTML report; absent fields are skipped.
    pub fn report_lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![("Status", self.status.clone())];
        if let Some(priority) = self.priority {
            lines.push(("Priority", priority.label().to_string()));
        }
        if let Some(project) = &self.project {
            lines.push(("Project", project.clone()));
        }
        if let Some(due) = self.due {
            lines.push(("Due", due.format("%A, %B %d, %Y at %I:%M %p").to_string()));
        }
        if let Some(diff) = &self.due_in {
            lines.push(("Due in", diff.describe()));
        }
        if let Some(diff) = &self.overdue_by {
            lines.push(("Overdue by", diff.describe()));
        }
        if self.urgency != 0.0 {
            lines.push(("Urgency", self.urgency.to_string()));
        }
        lines
    }
}

/// Keeps export order.
pub fn improve_all(
    raw_tasks: Vec<RawTask>,
    now: DateTime<Utc>,
) -> Result<Vec<ImprovedTask>, DateFormatError> {
    raw_tasks
        .into_iter()
        .map(|raw| ImprovedTask::from_raw(raw, now))
        .collect()
}

pub fn sort_by_urgency(tasks: &mut [ImprovedTask]) {
    tasks.sort_by(|a, b| b.urgency.total_cmp(&a.urgency));
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use duewatch_shared::Priority;

    use super::{ImprovedTask, RawTask, TimeDiff, improve_all, sort_by_urgency};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 17, 12, 0, 0)
            .single()
            .expect("valid now")
    }

    #[test]
    fn time_diff_is_absolute() {
        let later = now() + Duration::days(3) + Duration::hours(4) + Duration::minutes(5);
        let diff = TimeDiff::between(now(), later);
        assert_eq!(diff, TimeDiff { days: 3, hours: 4, minutes: 5 });
        assert_eq!(TimeDiff::between(later, now()), diff);
    }

    #[test]
    fn fills_defaults_for_missing_fields() {
        let task = ImprovedTask::from_raw(RawTask::default(), now()).expect("improve");
        assert_eq!(task.description, "");
        assert_eq!(task.status, "pending");
        assert_eq!(task.urgency, 0.0);
        assert_eq!(task.due, None);
        assert_eq!(task.due_in, None);
        assert_eq!(task.overdue_by, None);
    }

    #[test]
    fn splits_due_in_and_overdue_by() {
        let raw: Vec<RawTask> = serde_json::from_str(
            r#"[
                {"description": "late", "due": "20260215T120000Z", "priority": "H", "urgency": 2.0},
                {"description": "soon", "due": "20260217T133000Z", "priority": "X", "urgency": 9.0}
            ]"#,
        )
        .expect("decode raw tasks");

        let mut tasks = improve_all(raw, now()).expect("improve all");
        assert_eq!(tasks[0].description, "late");
        assert_eq!(tasks[0].priority, Some(Priority::High));
        assert_eq!(tasks[0].overdue_by, Some(TimeDiff { days: 2, hours: 0, minutes: 0 }));
        assert_eq!(tasks[1].priority, None);
        assert_eq!(tasks[1].due_in, Some(TimeDiff { days: 0, hours: 1, minutes: 30 }));

        sort_by_urgency(&mut tasks);
        assert_eq!(tasks[0].description, "soon");
    }

    #[test]
    fn malformed_due_is_an_error() {
        let raw = RawTask {
            due: Some("2026-02-17".to_string()),
            ..RawTask::default()
        };
        assert!(ImprovedTask::from_raw(raw, now()).is_err());
    }

    #[test]
    fn serializes_priority_and_iso_due() {
        let raw = RawTask {
            description: Some("ship".to_string()),
            due: Some("20260218T120000Z".to_string()),
            priority: Some("M".to_string()),
            ..RawTask::default()
        };
        let task = ImprovedTask::from_raw(raw, now()).expect("improve");
        let json = serde_json::to_value(&task).expect("encode");
        assert_eq!(json["priority"], "MEDIUM");
        assert_eq!(json["due"], "2026-02-18T12:00:00Z");
        assert_eq!(json["due_in"]["days"], 1);
        assert!(json["overdue_by"].is_null());
    }
}
