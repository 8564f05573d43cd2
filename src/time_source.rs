//! Time source abstraction for real and shifted clocks.
//!
//! The evaluation cycle asks a [`TimeSource`] for "now" instead of calling
//! `Local::now()` directly, so that `--at` can run nerdshade as if it were a
//! different time of day and tests can pin the clock.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};

/// Format accepted by `--at`.
pub const AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for abstracting the current time.
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Whether this source reports something other than the real clock
    fn is_simulated(&self) -> bool;
}

/// The system clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// A clock that never moves.
pub struct FixedTimeSource {
    time: DateTime<Local>,
}

impl FixedTimeSource {
    pub fn new(time: DateTime<Local>) -> Self {
        Self { time }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.time
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// The system clock shifted by a constant offset.
///
/// Starts at a chosen instant and then advances in real time, so a loop run
/// with `--at` still sees time passing between ticks.
pub struct SkewedTimeSource {
    offset: TimeDelta,
}

impl SkewedTimeSource {
    /// A clock that reads `start` right now.
    pub fn starting_at(start: DateTime<Local>) -> Self {
        Self {
            offset: start.signed_duration_since(Local::now()),
        }
    }

    pub fn offset(&self) -> TimeDelta {
        self.offset
    }
}

impl TimeSource for SkewedTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now() + self.offset
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Parse a local `"YYYY-MM-DD HH:MM:SS"` timestamp.
///
/// A time that falls into a DST gap is rejected; an ambiguous one resolves to
/// the earlier instant.
pub fn parse_local_datetime(value: &str) -> Result<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), AT_FORMAT).with_context(|| {
        format!("Invalid time \"{value}\", expected format YYYY-MM-DD HH:MM:SS")
    })?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("{naive} does not exist in the local timezone"))
}
