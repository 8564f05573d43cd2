//! Core evaluation logic.
//!
//! One evaluation cycle turns the current instant into display settings:
//!
//! 1. resolve the day boundaries for `when` ([`schedule`])
//! 2. compute the brightness level ([`brightness`])
//! 3. scale it into temperature and gamma
//! 4. push both values to the backend
//!
//! [`scheduler`] drives repeated cycles in loop mode.

pub mod brightness;
pub mod schedule;
pub mod scheduler;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, TimeZone};
use std::fmt;

use crate::backend::ColorTemperatureBackend;
use crate::config::Config;
use crate::core::brightness::{Phase, brightness_level, phase_at, scale_brightness};
use crate::core::schedule::ScheduleSource;

/// Everything computed by one evaluation, before it is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<Tz: TimeZone> {
    pub day_start: DateTime<Tz>,
    pub day_end: DateTime<Tz>,
    pub phase: Phase,
    pub brightness: f64,
    pub temperature: i32,
    pub gamma: i32,
}

/// Compute the display settings for `when` without touching the display.
pub fn evaluate<Tz: TimeZone>(config: &Config, when: &DateTime<Tz>) -> Result<Evaluation<Tz>> {
    let transition = TimeDelta::from_std(config.transition_duration()?)
        .context("Transition duration is out of range")?;

    let (day_start, day_end) = config.schedule_source().day_boundaries(when)?;

    let phase = phase_at(when, &day_start, &day_end, transition);
    let brightness = brightness_level(when, &day_start, &day_end, transition);

    Ok(Evaluation {
        day_start,
        day_end,
        phase,
        brightness,
        temperature: scale_brightness(brightness, config.night_temp(), config.day_temp()),
        gamma: scale_brightness(brightness, config.night_gamma(), config.day_gamma()),
    })
}

/// Run one full evaluation cycle and apply the result.
///
/// Never fails: a schedule error skips this cycle with a warning, and a
/// failure to apply temperature does not prevent gamma from being applied.
/// Returns the evaluation when one was computed.
pub fn get_and_set_brightness<Tz>(
    config: &Config,
    backend: &mut dyn ColorTemperatureBackend,
    when: &DateTime<Tz>,
    debug_enabled: bool,
) -> Option<Evaluation<Tz>>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let evaluation = match evaluate(config, when) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            log_warning!("Error getting brightness: {e:#}");
            return None;
        }
    };

    if debug_enabled {
        log_evaluation(config, when, &evaluation);
    }

    if let Err(e) = backend.apply_temperature(evaluation.temperature) {
        log_warning!("Error setting temperature: {e:#}");
    }
    if let Err(e) = backend.apply_gamma(evaluation.gamma) {
        log_warning!("Error setting gamma: {e:#}");
    }

    Some(evaluation)
}

fn log_evaluation<Tz>(config: &Config, when: &DateTime<Tz>, evaluation: &Evaluation<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let (start_label, end_label) = match config.schedule_source() {
        ScheduleSource::Location { .. } => ("Sunrise", "Sunset"),
        ScheduleSource::Fixed { .. } => ("Wakeup", "Bedtime"),
    };

    log_pipe!();
    log_debug!("Evaluating at {}", when.format("%Y-%m-%d %H:%M:%S %:z"));
    log_indented!(
        "{start_label}: {}",
        evaluation.day_start.format("%Y-%m-%d %H:%M:%S %:z")
    );
    log_indented!(
        "{end_label}: {}",
        evaluation.day_end.format("%Y-%m-%d %H:%M:%S %:z")
    );
    log_indented!("Phase: {}", evaluation.phase);
    log_indented!("Brightness: {:.3}", evaluation.brightness);
    log_indented!(
        "Applying: {}K @ {}% gamma",
        evaluation.temperature,
        evaluation.gamma
    );
}
