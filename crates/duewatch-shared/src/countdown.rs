use std::fmt;

use chrono::{
  DateTime,
  Datelike,
  Months,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

pub const SEGMENT_SEPARATOR: &str =
  " : ";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub enum Direction {
  Remaining,
  Overdue
}

impl Direction {
  pub fn title(self) -> &'static str {
    match self {
      | Self::Remaining => {
        "TIME REMAINING:"
      }
      | Self::Overdue => "OVERDUE BY:"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
  Good,
  Neutral,
  Bad
}

impl Tone {
  pub fn css_class(
    self
  ) -> &'static str {
    match self {
      | Self::Good => "good",
      | Self::Neutral => "neutral",
      | Self::Bad => "bad"
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Unit {
  Years,
  Months,
  Days,
  Hours,
  Minutes,
  Seconds
}

impl Unit {
  pub fn label(self) -> &'static str {
    match self {
      | Self::Years => "years",
      | Self::Months => "months",
      | Self::Days => "days",
      | Self::Hours => "hours",
      | Self::Minutes => "minutes",
      | Self::Seconds => "seconds"
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Segment {
  pub value: i64,
  pub unit:  Unit
}

impl fmt::Display for Segment {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:02} {}",
      self.value,
      self.unit.label()
    )
  }
}

/// A non-negative span split into
/// calendar years and months, then exact
/// days, hours, minutes and seconds.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct Breakdown {
  pub years:   i64,
  pub months:  i64,
  pub days:    i64,
  pub hours:   i64,
  pub minutes: i64,
  pub seconds: i64
}

impl Breakdown {
  pub fn between(
    a: DateTime<Utc>,
    b: DateTime<Utc>
  ) -> Self {
    let (start, end) =
      if a <= b { (a, b) } else { (b, a) };

    let month_gap = (end.year()
      - start.year())
      * 12
      + end.month() as i32
      - start.month() as i32;
    let mut whole_months =
      month_gap.max(0) as u32;

    // Adding months clamps to the end of
    // a short month, so the candidate can
    // overshoot `end` by up to one month.
    let cursor = loop {
      match start.checked_add_months(
        Months::new(whole_months)
      ) {
        | Some(candidate)
          if candidate <= end =>
        {
          break candidate;
        }
        | _ if whole_months == 0 => {
          break start;
        }
        | _ => whole_months -= 1
      }
    };

    let rest =
      (end - cursor).num_seconds().max(0);

    Self {
      years:   i64::from(whole_months)
        / 12,
      months:  i64::from(whole_months)
        % 12,
      days:    rest / SECONDS_PER_DAY,
      hours:   rest % SECONDS_PER_DAY
        / SECONDS_PER_HOUR,
      minutes: rest % SECONDS_PER_HOUR
        / SECONDS_PER_MINUTE,
      seconds: rest % SECONDS_PER_MINUTE
    }
  }

  pub fn spans_a_month(&self) -> bool {
    self.years > 0 || self.months > 0
  }

  /// Non-zero components down to
  /// minutes; seconds are always present.
  pub fn segments(&self) -> Vec<Segment> {
    let mut out = [
      (self.years, Unit::Years),
      (self.months, Unit::Months),
      (self.days, Unit::Days),
      (self.hours, Unit::Hours),
      (self.minutes, Unit::Minutes)
    ]
    .into_iter()
    .filter(|(value, _)| *value > 0)
    .map(|(value, unit)| Segment {
      value,
      unit
    })
    .collect::<Vec<_>>();

    out.push(Segment {
      value: self.seconds,
      unit:  Unit::Seconds
    });
    out
  }

  pub fn text(&self) -> String {
    self
      .segments()
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(SEGMENT_SEPARATOR)
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Countdown {
  pub direction: Direction,
  pub breakdown: Breakdown,
  pub tone:      Tone
}

impl Countdown {
  pub fn compute(
    due: DateTime<Utc>,
    now: DateTime<Utc>
  ) -> Self {
    let direction = if due > now {
      Direction::Remaining
    } else {
      Direction::Overdue
    };
    let breakdown =
      Breakdown::between(now, due);
    let tone =
      classify(direction, &breakdown);

    Self {
      direction,
      breakdown,
      tone
    }
  }

  pub fn title(&self) -> &'static str {
    self.direction.title()
  }

  pub fn text(&self) -> String {
    self.breakdown.text()
  }
}

fn classify(
  direction: Direction,
  breakdown: &Breakdown
) -> Tone {
  if direction == Direction::Overdue {
    return Tone::Bad;
  }
  if breakdown.spans_a_month() {
    return Tone::Good;
  }
  if breakdown.days <= 1 {
    Tone::Neutral
  } else {
    Tone::Good
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    DateTime,
    Duration,
    Months,
    TimeZone,
    Utc
  };

  use super::{
    Breakdown,
    Countdown,
    Direction,
    Tone,
    Unit
  };

  fn at(
    y: i32,
    mo: u32,
    d: u32,
    h: u32,
    mi: u32,
    s: u32
  ) -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(y, mo, d, h, mi, s)
      .single()
      .expect("valid instant")
  }

  fn now() -> DateTime<Utc> {
    at(2026, 2, 17, 12, 0, 0)
  }

  #[test]
  fn title_follows_direction() {
    let future = Countdown::compute(
      now() + Duration::seconds(1),
      now()
    );
    assert_eq!(
      future.title(),
      "TIME REMAINING:"
    );

    let same =
      Countdown::compute(now(), now());
    assert_eq!(
      same.title(),
      "OVERDUE BY:"
    );
    assert_eq!(
      same.direction,
      Direction::Overdue
    );
  }

  #[test]
  fn classification_bands() {
    let tone = |due| {
      Countdown::compute(due, now()).tone
    };

    assert_eq!(
      tone(
        now() - Duration::minutes(1)
      ),
      Tone::Bad
    );
    assert_eq!(
      tone(now() + Duration::days(1)),
      Tone::Neutral
    );
    assert_eq!(
      tone(
        now() + Duration::hours(5)
      ),
      Tone::Neutral
    );
    assert_eq!(
      tone(now() + Duration::days(2)),
      Tone::Good
    );
    assert_eq!(
      tone(
        now()
          .checked_add_months(
            Months::new(2)
          )
          .expect("two months ahead")
      ),
      Tone::Good
    );
    assert_eq!(
      tone(
        now()
          - Duration::days(400)
      ),
      Tone::Bad
    );
  }

  #[test]
  fn seconds_always_shown() {
    let breakdown =
      Breakdown::between(now(), now());
    let segments = breakdown.segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(
      segments[0].unit,
      Unit::Seconds
    );
    assert_eq!(
      breakdown.text(),
      "00 seconds"
    );
  }

  #[test]
  fn zero_components_are_omitted() {
    let breakdown = Breakdown::between(
      now(),
      now()
        + Duration::hours(1)
        + Duration::seconds(5)
    );
    assert_eq!(
      breakdown.text(),
      "01 hours : 05 seconds"
    );
  }

  #[test]
  fn months_follow_the_calendar() {
    let breakdown = Breakdown::between(
      at(2026, 1, 31, 0, 0, 0),
      at(2026, 3, 1, 0, 0, 0)
    );
    assert_eq!(breakdown.months, 1);
    assert_eq!(breakdown.days, 1);

    let breakdown = Breakdown::between(
      at(2023, 8, 27, 15, 30, 0),
      at(2025, 10, 28, 16, 31, 2)
    );
    assert_eq!(breakdown, Breakdown {
      years:   2,
      months:  2,
      days:    1,
      hours:   1,
      minutes: 1,
      seconds: 2
    });
    assert_eq!(
      breakdown.text(),
      "02 years : 02 months : 01 days \
       : 01 hours : 01 minutes : 02 \
       seconds"
    );
  }

  #[test]
  fn span_is_symmetric() {
    let due = at(2025, 12, 1, 8, 0, 0);
    let overdue =
      Countdown::compute(due, now());
    assert_eq!(
      overdue.breakdown,
      Breakdown::between(due, now())
    );
    assert_eq!(
      overdue.breakdown.months,
      2
    );
    assert_eq!(overdue.breakdown.days, 16);
  }
}
