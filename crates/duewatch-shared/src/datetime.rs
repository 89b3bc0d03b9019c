use std::fmt;
use std::sync::OnceLock;

use chrono::{
  DateTime,
  NaiveDate,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;

const HUMAN_FORMAT: &str =
  "%b %-d, %Y, %-I:%M %p";

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum DateFormatError {
  #[error(
    "expected a compact timestamp \
     like 20230827T153000, got {0:?}"
  )]
  Shape(String),
  #[error(
    "compact timestamp {0:?} is not a \
     valid calendar instant"
  )]
  OutOfRange(String)
}

fn compact_pattern()
-> Option<&'static Regex> {
  static PATTERN: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  PATTERN
    .get_or_init(|| {
      Regex::new(
        r"^(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})T(?P<hour>\d{2})(?P<minute>\d{2})(?P<second>\d{2})Z?$",
      )
      .ok()
    })
    .as_ref()
}

/// Parses `YYYYMMDDTHHMMSS` (optionally
/// followed by the `Z` TaskWarrior
/// appends) as a UTC instant.
#[tracing::instrument(level = "trace")]
pub fn parse_compact(
  text: &str
) -> Result<DateTime<Utc>, DateFormatError>
{
  let shape_err = || {
    DateFormatError::Shape(
      text.to_string()
    )
  };

  let caps = compact_pattern()
    .and_then(|re| re.captures(text))
    .ok_or_else(shape_err)?;

  let field = |name: &str| {
    caps
      .name(name)
      .and_then(|m| {
        m.as_str().parse::<u32>().ok()
      })
      .ok_or_else(shape_err)
  };

  let year = field("year")? as i32;
  let month = field("month")?;
  let day = field("day")?;
  let hour = field("hour")?;
  let minute = field("minute")?;
  let second = field("second")?;

  let naive =
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .and_then(|date| {
      date.and_hms_opt(
        hour, minute, second
      )
    })
    .ok_or_else(|| {
      DateFormatError::OutOfRange(
        text.to_string()
      )
    })?;

  Ok(Utc.from_utc_datetime(&naive))
}

/// Month abbreviation, day, year and a
/// 12-hour clock, in the viewer's zone:
/// `Aug 27, 2023, 3:30 PM`.
#[must_use]
pub fn format_human<Z>(
  instant: DateTime<Utc>,
  tz: &Z
) -> String
where
  Z: TimeZone,
  Z::Offset: fmt::Display
{
  instant
    .with_timezone(tz)
    .format(HUMAN_FORMAT)
    .to_string()
}

pub fn resolve_timezone(
  raw: Option<&str>
) -> Tz {
  let Some(raw) = raw else {
    return chrono_tz::UTC;
  };

  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      "timezone setting was empty; \
       using UTC"
    );
    return chrono_tz::UTC;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        timezone = %trimmed,
        "resolved viewer timezone"
      );
      tz
    }
    | Err(err) => {
      tracing::error!(
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id; using UTC"
      );
      chrono_tz::UTC
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use super::{
    DateFormatError,
    format_human,
    parse_compact,
    resolve_timezone
  };

  #[test]
  fn parses_compact_timestamp() {
    let parsed =
      parse_compact("20230827T153000")
        .expect("parse compact");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2023, 8, 27, 15, 30, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn accepts_taskwarrior_trailing_zulu()
  {
    let parsed =
      parse_compact("20230827T153000Z")
        .expect("parse with Z");
    assert_eq!(
      parsed,
      parse_compact("20230827T153000")
        .expect("parse without Z")
    );
  }

  #[test]
  fn human_format_in_utc() {
    let parsed =
      parse_compact("20230827T153000")
        .expect("parse compact");
    let text =
      format_human(parsed, &Utc);
    assert!(
      text.contains("Aug 27, 2023"),
      "{text}"
    );
    assert!(
      text.contains("3:30 PM"),
      "{text}"
    );
  }

  #[test]
  fn human_format_follows_viewer_zone()
  {
    let parsed =
      parse_compact("20230827T153000")
        .expect("parse compact");
    let tz = resolve_timezone(Some(
      "America/New_York"
    ));
    assert_eq!(
      format_human(parsed, &tz),
      "Aug 27, 2023, 11:30 AM"
    );
  }

  #[test]
  fn rejects_wrong_shape() {
    for input in [
      "",
      "20230827",
      "20230827 153000",
      "2023082T153000",
      "20230827T15300a",
      "20230827T153000ZZ"
    ] {
      assert!(
        matches!(
          parse_compact(input),
          Err(DateFormatError::Shape(_))
        ),
        "{input:?} should be a shape error"
      );
    }
  }

  #[test]
  fn rejects_out_of_range_components()
  {
    for input in [
      "20231327T153000",
      "20230231T153000",
      "20230827T253000",
      "20230827T156100"
    ] {
      assert!(
        matches!(
          parse_compact(input),
          Err(
            DateFormatError::OutOfRange(_)
          )
        ),
        "{input:?} should be out of range"
      );
    }
  }

  #[test]
  fn unknown_timezone_falls_back_to_utc()
  {
    assert_eq!(
      resolve_timezone(Some(
        "Mars/Olympus"
      )),
      chrono_tz::UTC
    );
    assert_eq!(
      resolve_timezone(None),
      chrono_tz::UTC
    );
  }
}
