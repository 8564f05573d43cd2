//! Application-wide constants and default values.
//!
//! Defaults here are used whenever neither the configuration file nor a
//! command-line flag supplies a value.

use std::time::Duration;

// # Color Defaults

pub const DEFAULT_NIGHT_TEMP: i32 = 4000;
pub const DEFAULT_DAY_TEMP: i32 = 6500;
pub const DEFAULT_NIGHT_GAMMA: i32 = 90;
pub const DEFAULT_DAY_GAMMA: i32 = 100;

// # Location Defaults

pub const DEFAULT_LATITUDE: f64 = 48.516;
pub const DEFAULT_LONGITUDE: f64 = 9.120;

// # Timing Defaults

/// Length of each brightness ramp at sunrise and sunset.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_secs(60 * 60);
/// Longest accepted ramp; a ramp spanning the whole day is already all transition.
pub const MAX_TRANSITION_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
/// Interval between re-evaluations in loop mode.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(30);

/// Decimal digits kept in brightness levels and ratios.
pub const BRIGHTNESS_PRECISION: u32 = 3;

// # External Commands

pub const DEFAULT_HYPRCTL_CMD: &str = "hyprctl";
pub const DEFAULT_ACPI_LISTEN_CMD: &str = "acpi_listen";
/// Event line printed by acpi_listen when the laptop lid is opened.
pub const ACPI_LID_OPEN_EVENT: &str = "button/lid LID open";

// # Files

pub const CONFIG_DIR_NAME: &str = "nerdshade";
pub const CONFIG_FILE_NAME: &str = "nerdshade.toml";
pub const LOCK_FILE_NAME: &str = "nerdshade.lock";

// # Exit Codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
