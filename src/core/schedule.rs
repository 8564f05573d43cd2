//! Day boundary resolution.
//!
//! Supplies the `(day_start, day_end)` pair for an instant, either from the
//! sun's position at a location or from a fixed wakeup/bedtime schedule.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fmt;

/// Where the day boundaries come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleSource {
    /// Sunrise and sunset at the given coordinates.
    Location { latitude: f64, longitude: f64 },
    /// Fixed 24-hour `HH:MM` times, parsed on every evaluation.
    Fixed { wakeup: String, bedtime: String },
}

impl fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleSource::Location {
                latitude,
                longitude,
            } => write!(f, "location ({latitude:.4}°, {longitude:.4}°)"),
            ScheduleSource::Fixed { wakeup, bedtime } => {
                write!(f, "fixed schedule (wakeup {wakeup}, bedtime {bedtime})")
            }
        }
    }
}

/// A time of day with hour in `0..=23` and minute in `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourMinute {
    pub hour: u32,
    pub minute: u32,
}

/// Error parsing a `HH:MM` time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// Not exactly one `:` separator.
    Malformed,
    /// A component is not an integer.
    InvalidNumber { component: String },
    /// Both components parsed, hour outside `0..=23`.
    HourOutOfRange { hour: i32, minute: i32 },
    /// Both components parsed, minute outside `0..=59`.
    MinuteOutOfRange { hour: i32, minute: i32 },
}

impl TimeParseError {
    /// The hour and minute that were read before range checking failed.
    pub fn parsed(&self) -> Option<(i32, i32)> {
        match self {
            TimeParseError::HourOutOfRange { hour, minute }
            | TimeParseError::MinuteOutOfRange { hour, minute } => Some((*hour, *minute)),
            _ => None,
        }
    }
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeParseError::Malformed => {
                write!(f, "Time value malformed, needs to be of the form \"HH:MM\"")
            }
            TimeParseError::InvalidNumber { component } => {
                write!(f, "Invalid number \"{component}\" in time value")
            }
            TimeParseError::HourOutOfRange { hour, .. } => {
                write!(f, "Hour value ({hour}) must be >=0 and <=23")
            }
            TimeParseError::MinuteOutOfRange { minute, .. } => {
                write!(f, "Minute value ({minute}) must be >=0 and <=59")
            }
        }
    }
}

impl std::error::Error for TimeParseError {}

/// Parse a 24-hour `"HH:MM"` string. A single-digit hour such as `"9:00"` is accepted.
pub fn parse_hour_minute(value: &str) -> Result<HourMinute, TimeParseError> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 2 {
        return Err(TimeParseError::Malformed);
    }

    let parse_component = |component: &str| {
        component
            .parse::<i32>()
            .map_err(|_| TimeParseError::InvalidNumber {
                component: component.to_string(),
            })
    };
    let hour = parse_component(parts[0])?;
    let minute = parse_component(parts[1])?;

    if !(0..=23).contains(&hour) {
        return Err(TimeParseError::HourOutOfRange { hour, minute });
    }
    if !(0..=59).contains(&minute) {
        return Err(TimeParseError::MinuteOutOfRange { hour, minute });
    }

    Ok(HourMinute {
        hour: hour as u32,
        minute: minute as u32,
    })
}

/// `when`'s calendar date combined with a time of day, in `when`'s timezone.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
fn on_same_day<Tz: TimeZone>(when: &DateTime<Tz>, time: HourMinute) -> Result<DateTime<Tz>> {
    let naive = when
        .date_naive()
        .and_hms_opt(time.hour, time.minute, 0)
        .context("Invalid time of day")?;
    when.timezone()
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("{naive} does not exist in the local timezone"))
}

impl ScheduleSource {
    /// The `(day_start, day_end)` pair for `when`'s calendar day.
    ///
    /// Fixed schedules are parsed here, so a malformed time fails this call
    /// with a [`TimeParseError`] in the error chain.
    pub fn day_boundaries<Tz: TimeZone>(
        &self,
        when: &DateTime<Tz>,
    ) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
        match self {
            ScheduleSource::Location {
                latitude,
                longitude,
            } => {
                let (sunrise, sunset) =
                    crate::geo::sun_times(*latitude, *longitude, when.date_naive())?;
                let tz = when.timezone();
                Ok((sunrise.with_timezone(&tz), sunset.with_timezone(&tz)))
            }
            ScheduleSource::Fixed { wakeup, bedtime } => {
                let wakeup_time = parse_hour_minute(wakeup)?;
                let bedtime_time = parse_hour_minute(bedtime)?;
                Ok((
                    on_same_day(when, wakeup_time)?,
                    on_same_day(when, bedtime_time)?,
                ))
            }
        }
    }
}
