//! Sunrise and sunset calculation for location mode.
//!
//! Uses the `sunrise` crate to compute the sun's rise and set for a calendar
//! date at a coordinate. Results are in UTC; callers convert them into the
//! timezone of the instant being evaluated.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

/// Sunrise and sunset in UTC for `date` at the given coordinates.
///
/// Latitude must be within `[-90, 90]` and longitude within `[-180, 180]`.
pub fn sun_times(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let coord = Coordinates::new(latitude, longitude)
        .ok_or_else(|| anyhow::anyhow!("Invalid coordinates: {latitude:.4}°, {longitude:.4}°"))?;
    let solar_day = SolarDay::new(coord, date);
    let sunrise = solar_day.event_time(SolarEvent::Sunrise);
    let sunset = solar_day.event_time(SolarEvent::Sunset);
    Ok((sunrise, sunset))
}

/// Log the solar calculation for `date`, used in debug mode.
pub fn log_solar_debug_info(latitude: f64, longitude: f64, date: NaiveDate) -> Result<()> {
    let (sunrise, sunset) = sun_times(latitude, longitude, date)?;
    log_pipe!();
    log_debug!("Solar calculation details:");
    log_indented!("Coordinates: {latitude:.4}°, {longitude:.4}°");
    log_indented!("Date: {date}");
    log_indented!("Sunrise UTC: {}", sunrise.format("%H:%M:%S"));
    log_indented!(" Sunset UTC: {}", sunset.format("%H:%M:%S"));
    Ok(())
}
