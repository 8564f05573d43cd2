//! Backend abstraction layer for display color control.
//!
//! The evaluation cycle talks to the display through the
//! [`ColorTemperatureBackend`] trait. The production implementation shells out
//! to `hyprctl hyprsunset ...` ([`hyprctl::HyprctlBackend`]); tests substitute a
//! mock so that evaluation can be checked without a running compositor.
//!
//! Temperature and gamma are applied as two independent operations. A failure
//! of one does not prevent the other from being attempted.

use anyhow::Result;

use crate::config::Config;

pub mod hyprctl;

/// Trait for backends that can set display color temperature and gamma.
#[cfg_attr(test, mockall::automock)]
pub trait ColorTemperatureBackend {
    /// Set the color temperature in Kelvin.
    fn apply_temperature(&mut self, temperature: i32) -> Result<()>;

    /// Set gamma as a percentage.
    fn apply_gamma(&mut self, gamma: i32) -> Result<()>;

    /// A human-readable name for this backend, e.g. "hyprctl".
    fn backend_name(&self) -> &'static str;
}

/// Create the backend described by `config`.
pub fn create_backend(config: &Config, debug_enabled: bool) -> Box<dyn ColorTemperatureBackend> {
    Box::new(hyprctl::HyprctlBackend::new(
        config.hyprctl_command(),
        debug_enabled,
    ))
}
