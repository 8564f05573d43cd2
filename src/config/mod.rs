//! Configuration system for nerdshade.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. built-in defaults (see [`crate::common::constants`])
//! 2. `nerdshade.toml` in the config directory
//! 3. command-line flags
//!
//! Every field is optional in both the file and the flag layer, so the layers
//! are merged field by field with [`Config::merge`] and defaults are applied
//! when a value is read.
//!
//! ## Configuration File
//!
//! ```toml
//! #[Output ranges]
//! night_temp = 4000              # Color temperature at night (Kelvin)
//! day_temp = 6500                # Color temperature during the day (Kelvin)
//! night_gamma = 90               # Gamma at night (percent)
//! day_gamma = 100                # Gamma during the day (percent)
//!
//! #[Schedule]
//! latitude = 48.516              # Location used for sunrise/sunset
//! longitude = 9.120
//! # fixed_wakeup = "6:30"        # Fixed schedule, overrides the location
//! # fixed_bedtime = "22:30"      # (both or neither)
//! transition_duration = "1h"     # Ramp length at each boundary
//!
//! #[Loop]
//! loop = false                   # Keep running and re-evaluate periodically
//! update_interval = "30s"        # Time between evaluations
//! hyprctl = "hyprctl"            # hyprctl command used to reach hyprsunset
//! acpi_events = true             # Re-evaluate on ACPI events
//! acpi_listen = "acpi_listen"    # ACPI event listener command
//! acpi_event = "button/lid LID open"
//! ```
//!
//! Unknown keys are rejected so that typos do not silently fall back to defaults.

pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::common::constants::*;
use crate::common::utils::{format_duration, parse_duration};
use crate::core::schedule::ScheduleSource;

// Re-export public API
pub use loading::{get_config_dir, get_config_path, load, load_from_path, load_with_overrides};
pub use validation::validate_config;

/// Configuration structure for nerdshade settings.
///
/// Used both for the parsed configuration file and for the set of values given
/// on the command line. `None` means "not set in this layer".
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub night_temp: Option<i32>,
    pub day_temp: Option<i32>,
    pub night_gamma: Option<i32>,
    pub day_gamma: Option<i32>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Fixed wakeup time, `HH:MM`. Requires `fixed_bedtime`.
    pub fixed_wakeup: Option<String>,
    /// Fixed bedtime, `HH:MM`. Requires `fixed_wakeup`.
    pub fixed_bedtime: Option<String>,

    pub transition_duration: Option<String>, // e.g. "1h", "45m", "1h10m"
    pub update_interval: Option<String>,     // e.g. "30s"

    /// Keep running after the first evaluation.
    #[serde(rename = "loop")]
    pub run_loop: Option<bool>,

    pub hyprctl: Option<String>,

    pub acpi_events: Option<bool>,
    pub acpi_listen: Option<String>,
    /// Event line that triggers re-evaluation. Empty matches every event.
    pub acpi_event: Option<String>,
}

impl Config {
    /// Overlay `overrides` on top of `self`; fields set in `overrides` win.
    pub fn merge(self, overrides: &Config) -> Config {
        Config {
            night_temp: overrides.night_temp.or(self.night_temp),
            day_temp: overrides.day_temp.or(self.day_temp),
            night_gamma: overrides.night_gamma.or(self.night_gamma),
            day_gamma: overrides.day_gamma.or(self.day_gamma),
            latitude: overrides.latitude.or(self.latitude),
            longitude: overrides.longitude.or(self.longitude),
            fixed_wakeup: overrides.fixed_wakeup.clone().or(self.fixed_wakeup),
            fixed_bedtime: overrides.fixed_bedtime.clone().or(self.fixed_bedtime),
            transition_duration: overrides
                .transition_duration
                .clone()
                .or(self.transition_duration),
            update_interval: overrides.update_interval.clone().or(self.update_interval),
            run_loop: overrides.run_loop.or(self.run_loop),
            hyprctl: overrides.hyprctl.clone().or(self.hyprctl),
            acpi_events: overrides.acpi_events.or(self.acpi_events),
            acpi_listen: overrides.acpi_listen.clone().or(self.acpi_listen),
            acpi_event: overrides.acpi_event.clone().or(self.acpi_event),
        }
    }

    pub fn night_temp(&self) -> i32 {
        self.night_temp.unwrap_or(DEFAULT_NIGHT_TEMP)
    }

    pub fn day_temp(&self) -> i32 {
        self.day_temp.unwrap_or(DEFAULT_DAY_TEMP)
    }

    pub fn night_gamma(&self) -> i32 {
        self.night_gamma.unwrap_or(DEFAULT_NIGHT_GAMMA)
    }

    pub fn day_gamma(&self) -> i32 {
        self.day_gamma.unwrap_or(DEFAULT_DAY_GAMMA)
    }

    pub fn transition_duration(&self) -> Result<Duration> {
        match &self.transition_duration {
            Some(value) => parse_duration(value),
            None => Ok(DEFAULT_TRANSITION_DURATION),
        }
    }

    pub fn update_interval(&self) -> Result<Duration> {
        match &self.update_interval {
            Some(value) => parse_duration(value),
            None => Ok(DEFAULT_UPDATE_INTERVAL),
        }
    }

    pub fn run_loop(&self) -> bool {
        self.run_loop.unwrap_or(false)
    }

    pub fn hyprctl_command(&self) -> &str {
        self.hyprctl.as_deref().unwrap_or(DEFAULT_HYPRCTL_CMD)
    }

    pub fn acpi_events(&self) -> bool {
        self.acpi_events.unwrap_or(true)
    }

    pub fn acpi_listen_command(&self) -> &str {
        self.acpi_listen.as_deref().unwrap_or(DEFAULT_ACPI_LISTEN_CMD)
    }

    pub fn acpi_event_filter(&self) -> &str {
        self.acpi_event.as_deref().unwrap_or(ACPI_LID_OPEN_EVENT)
    }

    /// Fixed wakeup time; blank values count as unset.
    pub fn fixed_wakeup(&self) -> Option<&str> {
        non_blank(&self.fixed_wakeup)
    }

    /// Fixed bedtime; blank values count as unset.
    pub fn fixed_bedtime(&self) -> Option<&str> {
        non_blank(&self.fixed_bedtime)
    }

    /// Where day boundaries come from.
    ///
    /// A fixed schedule is used only when both times are set; validation
    /// rejects configurations with just one of them.
    pub fn schedule_source(&self) -> ScheduleSource {
        match (self.fixed_wakeup(), self.fixed_bedtime()) {
            (Some(wakeup), Some(bedtime)) => ScheduleSource::Fixed {
                wakeup: wakeup.to_string(),
                bedtime: bedtime.to_string(),
            },
            _ => ScheduleSource::Location {
                latitude: self.latitude.unwrap_or(DEFAULT_LATITUDE),
                longitude: self.longitude.unwrap_or(DEFAULT_LONGITUDE),
            },
        }
    }

    /// Log the effective configuration.
    pub fn log_config(&self, source: &str) {
        log_block_start!("Loaded {source}");

        match self.schedule_source() {
            ScheduleSource::Location {
                latitude,
                longitude,
            } => {
                let lat_dir = if latitude >= 0.0 { "N" } else { "S" };
                let lon_dir = if longitude >= 0.0 { "E" } else { "W" };
                log_indented!(
                    "Mode: location ({:.4}°{lat_dir}, {:.4}°{lon_dir})",
                    latitude.abs(),
                    longitude.abs()
                );
            }
            ScheduleSource::Fixed { wakeup, bedtime } => {
                log_indented!("Mode: fixed schedule");
                log_indented!("Wakeup: {wakeup}");
                log_indented!("Bedtime: {bedtime}");
            }
        }

        log_indented!(
            "Night: {}K @ {}% gamma",
            self.night_temp(),
            self.night_gamma()
        );
        log_indented!("Day: {}K @ {}% gamma", self.day_temp(), self.day_gamma());

        if let Ok(duration) = self.transition_duration() {
            log_indented!("Transition duration: {}", format_duration(duration));
        }

        if self.run_loop() {
            if let Ok(interval) = self.update_interval() {
                log_indented!("Update interval: {}", format_duration(interval));
            }
            if self.acpi_events() {
                let filter = self.acpi_event_filter();
                log_indented!(
                    "ACPI events: {} ({})",
                    self.acpi_listen_command(),
                    if filter.is_empty() { "all events" } else { filter }
                );
            } else {
                log_indented!("ACPI events: disabled");
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests;
