//! Working-hours resolution for a merchant's weekly schedule.
//!
//! Schedules arrive as raw JSON from the primary profile. Anything that prevents a
//! decision (missing data, bad JSON, an unknown zone, an unconfigured day) resolves to
//! [`ScheduleResolution::Unknown`], which callers treat as open. Days are read
//! independently, so a malformed Sunday never affects a Monday lookup.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Key used for a weekday in the working-hours payload.
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Segment lists keyed by lowercase weekday name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub monday: Option<Vec<TimeSegment>>,
    pub tuesday: Option<Vec<TimeSegment>>,
    pub wednesday: Option<Vec<TimeSegment>>,
    pub thursday: Option<Vec<TimeSegment>>,
    pub friday: Option<Vec<TimeSegment>>,
    pub saturday: Option<Vec<TimeSegment>>,
    pub sunday: Option<Vec<TimeSegment>>,
    unreadable: Vec<Weekday>,
}

impl WeeklySchedule {
    /// Reads each weekday on its own. Days whose segments do not deserialize are
    /// recorded as unreadable instead of failing the whole week.
    pub fn from_value(raw: &Value) -> Result<Self, serde_json::Error> {
        let Value::Object(days) = raw else {
            return Err(serde::de::Error::custom(
                "working hours must be an object keyed by weekday",
            ));
        };

        let mut schedule = WeeklySchedule::default();
        for day in WEEK {
            let segments = match days.get(day_key(day)) {
                None | Some(Value::Null) => None,
                Some(value) => match Vec::<TimeSegment>::deserialize(value) {
                    Ok(segments) => Some(segments),
                    Err(_) => {
                        schedule.unreadable.push(day);
                        None
                    }
                },
            };
            *schedule.slot_mut(day) = segments;
        }
        Ok(schedule)
    }

    pub fn segments(&self, day: Weekday) -> Option<&[TimeSegment]> {
        let segments = match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        };
        segments.as_deref()
    }

    fn slot_mut(&mut self, day: Weekday) -> &mut Option<Vec<TimeSegment>> {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn is_unreadable(&self, day: Weekday) -> bool {
        self.unreadable.contains(&day)
    }

    /// `None` when the day has no segments; otherwise whether any segment covers the minute.
    pub fn open_at(&self, day: Weekday, minute_of_day: u32) -> Option<bool> {
        let segments = self.segments(day).filter(|segments| !segments.is_empty())?;

        Some(segments.iter().any(|segment| segment.matches(minute_of_day)))
    }
}

/// One opening window, `"HH:mm"` on both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub close: String,
    #[serde(
        default,
        deserialize_with = "truthy",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed: Option<bool>,
}

/// `closed` follows JSON truthiness: `1` or `"yes"` close a segment, `0` and `""` do not.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let flag = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    Ok(Some(flag))
}

impl TimeSegment {
    pub fn is_closed(&self) -> bool {
        self.closed.unwrap_or(false)
    }

    /// Parsed window, or `None` if either end is malformed.
    pub fn window(&self) -> Option<SegmentWindow> {
        Some(SegmentWindow {
            open: parse_clock(&self.open)?,
            close: parse_clock(&self.close)?,
        })
    }

    /// Closed and malformed segments never match; the rest of the day still counts.
    pub fn matches(&self, minute_of_day: u32) -> bool {
        if self.is_closed() {
            return false;
        }

        match self.window() {
            Some(window) => window.contains(minute_of_day),
            None => {
                warn!(
                    open = %self.open,
                    close = %self.close,
                    "ignoring working-hours segment with malformed HH:mm bounds"
                );
                false
            }
        }
    }
}

/// Segment bounds in minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentWindow {
    pub open: u32,
    pub close: u32,
}

impl SegmentWindow {
    pub fn spans_midnight(&self) -> bool {
        self.close < self.open
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, minute_of_day: u32) -> bool {
        if self.spans_midnight() {
            minute_of_day >= self.open || minute_of_day <= self.close
        } else {
            self.open <= minute_of_day && minute_of_day <= self.close
        }
    }
}

/// Parses `"HH:mm"` (extra `:ss` ignored) into minutes since midnight. An empty
/// component reads as zero, so `"09:"` is 09:00; a missing `:` is malformed.
pub fn parse_clock(raw: &str) -> Option<u32> {
    let mut parts = raw.split(':');
    let hour = parse_component(parts.next()?)?;
    let minute = parse_component(parts.next()?)?;
    hour.checked_mul(60)?.checked_add(minute)
}

fn parse_component(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}

/// Why a schedule could not produce an open/closed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownSchedule {
    Missing,
    Unparseable,
    UnknownTimezone,
    DayNotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleResolution {
    Open,
    Closed,
    Unknown(UnknownSchedule),
}

impl ScheduleResolution {
    /// Unknown schedules never close a storefront.
    pub fn is_open(&self) -> bool {
        match self {
            ScheduleResolution::Open => true,
            ScheduleResolution::Closed => false,
            ScheduleResolution::Unknown(_) => true,
        }
    }
}

/// Accepts either the schedule object or its serialized JSON string form.
pub fn parse_schedule(raw: &Value) -> Result<WeeklySchedule, serde_json::Error> {
    match raw {
        Value::String(serialized) => {
            WeeklySchedule::from_value(&serde_json::from_str(serialized)?)
        }
        other => WeeklySchedule::from_value(other),
    }
}

pub fn resolve_schedule(
    raw: Option<&Value>,
    timezone: &str,
    now: DateTime<Utc>,
) -> ScheduleResolution {
    let raw = match raw {
        None | Some(Value::Null) => return ScheduleResolution::Unknown(UnknownSchedule::Missing),
        Some(Value::String(serialized)) if serialized.trim().is_empty() => {
            return ScheduleResolution::Unknown(UnknownSchedule::Missing)
        }
        Some(raw) => raw,
    };

    let schedule = match parse_schedule(raw) {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!(error = %err, "working hours payload did not parse; treating as open");
            return ScheduleResolution::Unknown(UnknownSchedule::Unparseable);
        }
    };

    let zone: Tz = match timezone.parse() {
        Ok(zone) => zone,
        Err(_) => {
            warn!(%timezone, "unknown merchant timezone; treating as open");
            return ScheduleResolution::Unknown(UnknownSchedule::UnknownTimezone);
        }
    };

    let local = now.with_timezone(&zone);
    let minute_of_day = local.hour() * 60 + local.minute();

    let day = local.weekday();
    if schedule.is_unreadable(day) {
        warn!(
            day = day_key(day),
            "working hours for the current day did not parse; treating as open"
        );
        return ScheduleResolution::Unknown(UnknownSchedule::Unparseable);
    }

    match schedule.open_at(day, minute_of_day) {
        Some(true) => ScheduleResolution::Open,
        Some(false) => ScheduleResolution::Closed,
        None => ScheduleResolution::Unknown(UnknownSchedule::DayNotConfigured),
    }
}

pub fn is_open_now(raw: Option<&Value>, timezone: &str, now: DateTime<Utc>) -> bool {
    resolve_schedule(raw, timezone, now).is_open()
}
