//! Configuration validation.
//!
//! Runs once on the fully merged configuration. Any error here is fatal at
//! startup.

use anyhow::{Context, Result};

use super::Config;
use crate::common::constants::MAX_TRANSITION_DURATION;
use crate::common::utils::format_duration;

pub fn validate_config(config: &Config) -> Result<()> {
    // Fixed schedule needs both ends
    if config.fixed_wakeup().is_some() != config.fixed_bedtime().is_some() {
        anyhow::bail!("Both --fixed-bedtime and --fixed-wakeup need to be supplied");
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    let transition_duration = config
        .transition_duration()
        .context("Invalid transition_duration")?;
    if transition_duration.is_zero() {
        anyhow::bail!("transition_duration must be greater than zero");
    }
    if transition_duration > MAX_TRANSITION_DURATION {
        anyhow::bail!(
            "transition_duration must be at most {}",
            format_duration(MAX_TRANSITION_DURATION)
        );
    }

    let update_interval = config
        .update_interval()
        .context("Invalid update_interval")?;
    if update_interval.is_zero() {
        anyhow::bail!("update_interval must be greater than zero");
    }

    if config.hyprctl_command().trim().is_empty() {
        anyhow::bail!("hyprctl command must not be empty");
    }

    if config.acpi_events() && config.acpi_listen_command().trim().is_empty() {
        anyhow::bail!("acpi_listen command must not be empty while ACPI events are enabled");
    }

    Ok(())
}
