//! Brightness transition model.
//!
//! Pure functions that turn an instant, a day boundary pair and a transition
//! duration into a brightness level between 0.0 (night) and 1.0 (day), and that
//! map a brightness level onto an integer output range.
//!
//! A day is split into four regions, checked in this order:
//!
//! ```text
//!  night  │ sunrise ramp │        day        │ sunset ramp │  night
//! ────────┼──────────────┼───────────────────┼─────────────┼────────
//!     day_start    day_start+D          day_end-D      day_end
//! ```
//!
//! When `D` is longer than half the day the two ramps overlap. The sunrise
//! check runs first, so the overlap follows the sunrise ramp.

use chrono::{DateTime, TimeDelta, TimeZone};
use std::fmt;

use crate::common::constants::BRIGHTNESS_PRECISION;

/// The region of the day an instant falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Night,
    Sunrise,
    Day,
    Sunset,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Night => write!(f, "night"),
            Phase::Sunrise => write!(f, "sunrise"),
            Phase::Day => write!(f, "day"),
            Phase::Sunset => write!(f, "sunset"),
        }
    }
}

/// Round `value` to `precision` decimal digits, halves away from zero.
pub fn round_float(value: f64, precision: u32) -> f64 {
    let ratio = 10_f64.powi(precision as i32);
    (value * ratio).round() / ratio
}

/// Round to the precision used for brightness levels.
pub fn round3(value: f64) -> f64 {
    round_float(value, BRIGHTNESS_PRECISION)
}

/// How far `from` has progressed towards `to`, relative to `duration`.
///
/// Examples for a one hour duration:
///
/// ```text
/// 16:45 -> 17:00  0.750
/// 05:00 -> 05:00  1.000
/// 06:30 -> 06:10  0.000   (target already passed)
/// 04:00 -> 06:10  1.000   (target outside the window)
/// ```
///
/// `duration` must be positive; configuration validation guarantees this.
pub fn time_ratio<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>, duration: TimeDelta) -> f64 {
    if to < from {
        return 0.0;
    }
    // A window end past the representable range cannot be exceeded
    if let Some(window_end) = from.clone().checked_add_signed(duration)
        && *to > window_end
    {
        return 1.0;
    }
    if duration <= TimeDelta::zero() {
        return 1.0;
    }

    let remaining = to.clone().signed_duration_since(from.clone());
    let total = seconds_f64(duration);
    round3((total - seconds_f64(remaining)) / total).min(1.0)
}

/// `delta` in fractional seconds, keeping sub-millisecond precision.
fn seconds_f64(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

/// Which region of the day `when` belongs to.
pub fn phase_at<Tz: TimeZone>(
    when: &DateTime<Tz>,
    day_start: &DateTime<Tz>,
    day_end: &DateTime<Tz>,
    transition: TimeDelta,
) -> Phase {
    if when <= day_start || when >= day_end {
        return Phase::Night;
    }

    // Ramp edges outside the representable range cover every instant
    let in_sunrise = day_start
        .clone()
        .checked_add_signed(transition)
        .is_none_or(|ramp_end| *when < ramp_end);
    let in_sunset = day_end
        .clone()
        .checked_sub_signed(transition)
        .is_none_or(|ramp_start| *when > ramp_start);

    if in_sunrise {
        Phase::Sunrise
    } else if in_sunset {
        Phase::Sunset
    } else {
        Phase::Day
    }
}

/// Brightness at `when` for the given day boundaries, from 0.0 to 1.0.
///
/// Exactly at either boundary the level is 0.0. The sunrise ramp rises from
/// `day_start` to `day_start + transition`, the sunset ramp falls from
/// `day_end - transition` to `day_end`.
pub fn brightness_level<Tz: TimeZone>(
    when: &DateTime<Tz>,
    day_start: &DateTime<Tz>,
    day_end: &DateTime<Tz>,
    transition: TimeDelta,
) -> f64 {
    match phase_at(when, day_start, day_end, transition) {
        Phase::Night => 0.0,
        Phase::Sunrise => match day_start.clone().checked_add_signed(transition) {
            Some(ramp_end) => round3(time_ratio(when, &ramp_end, transition)),
            None => round3(
                seconds_f64(when.clone().signed_duration_since(day_start.clone()))
                    / seconds_f64(transition),
            ),
        },
        Phase::Sunset => round3(1.0 - time_ratio(when, day_end, transition)),
        Phase::Day => 1.0,
    }
}

/// Linearly map a brightness level onto `min..=max`, truncating to an integer.
///
/// Used for both color temperature and gamma.
pub fn scale_brightness(brightness: f64, min: i32, max: i32) -> i32 {
    ((max as f64 - min as f64) * brightness + min as f64) as i32
}
