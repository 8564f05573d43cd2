//! Application coordinator that manages the complete lifecycle of nerdshade.
//!
//! One-shot mode evaluates the schedule once and exits. Loop mode additionally
//! takes the single-instance lock, installs the signal handler, starts the ACPI
//! listener and keeps re-evaluating until interrupted.
//!
//! The `Nerdshade` struct uses a builder pattern so that the binary and tests
//! can swap the clock and the display backend:
//! - Normal startup: `Nerdshade::new(config, debug_enabled).run()`
//! - Simulated time: `Nerdshade::new(config, debug_enabled).with_time_source(source).run()`

use anyhow::Result;
use std::path::PathBuf;

use crate::{
    backend::{ColorTemperatureBackend, create_backend},
    config::Config,
    core::{
        get_and_set_brightness,
        schedule::ScheduleSource,
        scheduler::{LoopStats, Trigger, repeat_until_interrupt},
    },
    geo::log_solar_debug_info,
    io::{
        acpi::{AcpiListener, start_acpi_listener},
        lock::{acquire_lock_at, default_lock_path},
        signals::setup_signal_handler,
    },
    time_source::{RealTimeSource, TimeSource},
};

/// Builder for configuring and running nerdshade.
///
/// # Examples
///
/// ```no_run
/// use nerdshade::Nerdshade;
/// use nerdshade::config::Config;
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config {
///     run_loop: Some(true),
///     ..Config::default()
/// };
/// Nerdshade::new(config, false).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Nerdshade {
    config: Config,
    debug_enabled: bool,
    show_headers: bool,
    time_source: Box<dyn TimeSource>,
    backend: Option<Box<dyn ColorTemperatureBackend>>,
    lock_path: Option<PathBuf>,
}

impl Nerdshade {
    /// Create a new runner using the real clock and the hyprctl backend.
    pub fn new(config: Config, debug_enabled: bool) -> Self {
        Self {
            config,
            debug_enabled,
            show_headers: true,
            time_source: Box::new(RealTimeSource),
            backend: None,
            lock_path: None,
        }
    }

    /// Use a different clock (for `--at` and tests)
    pub fn with_time_source(mut self, time_source: Box<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Use a specific backend instead of the one derived from the configuration
    pub fn with_backend(mut self, backend: Box<dyn ColorTemperatureBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Take the loop mode lock at `path` instead of the runtime directory
    pub fn with_lock_path(mut self, path: PathBuf) -> Self {
        self.lock_path = Some(path);
        self
    }

    /// Skip the version header
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Execute the application with the configured settings.
    ///
    /// Returns the loop statistics; a one-shot run reports none.
    pub fn run(self) -> Result<LoopStats> {
        let Nerdshade {
            config,
            debug_enabled,
            show_headers,
            time_source,
            backend,
            lock_path,
        } = self;

        if show_headers {
            log_version!();
            if debug_enabled {
                log_pipe!();
                log_debug!("Debug mode enabled, showing every evaluation");
            }
        }

        config.log_config("configuration");

        if time_source.is_simulated() {
            log_block_start!(
                "Simulating time, starting at {}",
                time_source.now().format("%Y-%m-%d %H:%M:%S")
            );
        }

        let mut backend = backend.unwrap_or_else(|| create_backend(&config, debug_enabled));
        if debug_enabled {
            log_pipe!();
            log_debug!("Using {} backend", backend.backend_name());
        }

        if !config.run_loop() {
            run_cycle(&config, backend.as_mut(), time_source.as_ref(), debug_enabled);
            log_end!();
            return Ok(LoopStats::default());
        }

        // Held until the end of this function
        let lock = acquire_lock_at(&lock_path.unwrap_or_else(default_lock_path))?;
        if debug_enabled {
            log_pipe!();
            log_debug!("Lock acquired at {}", lock.path().display());
        }

        let signal_state = setup_signal_handler(debug_enabled)?;

        let _acpi_listener = if config.acpi_events() {
            start_listener(&config, &signal_state.signal_sender, debug_enabled)
        } else {
            None
        };

        // The loop only fires on ticks and events
        run_cycle(&config, backend.as_mut(), time_source.as_ref(), debug_enabled);

        let interval = config.update_interval()?;
        log_block_start!("Entering update loop");

        let stats = repeat_until_interrupt(
            |trigger| {
                if debug_enabled {
                    log_pipe!();
                    log_debug!("Re-evaluating on {trigger}");
                } else if let Trigger::Event(line) = &trigger {
                    log_block_start!("Re-evaluating on ACPI event \"{line}\"");
                }
                run_cycle(&config, backend.as_mut(), time_source.as_ref(), debug_enabled);
            },
            interval,
            &signal_state,
            debug_enabled,
        );

        log_block_start!("Shutting down nerdshade...");
        if debug_enabled {
            log_indented!("Ticks handled: {}", stats.ticks);
            log_indented!("Events handled: {}", stats.events);
        }
        log_end!();

        Ok(stats)
    }
}

/// Evaluate the schedule at the time source's "now" and apply it.
fn run_cycle(
    config: &Config,
    backend: &mut dyn ColorTemperatureBackend,
    time_source: &dyn TimeSource,
    debug_enabled: bool,
) {
    let now = time_source.now();

    if debug_enabled
        && let ScheduleSource::Location {
            latitude,
            longitude,
        } = config.schedule_source()
        && let Err(e) = log_solar_debug_info(latitude, longitude, now.date_naive())
    {
        log_warning!("Solar calculation failed: {e}");
    }

    get_and_set_brightness(config, backend, &now, debug_enabled);
}

/// Start the ACPI listener, degrading to tick-only operation on failure.
fn start_listener(
    config: &Config,
    sender: &std::sync::mpsc::Sender<crate::io::signals::SignalMessage>,
    debug_enabled: bool,
) -> Option<AcpiListener> {
    match start_acpi_listener(
        config.acpi_listen_command(),
        config.acpi_event_filter(),
        sender.clone(),
        debug_enabled,
    ) {
        Ok(listener) => {
            if debug_enabled {
                log_pipe!();
                log_debug!(
                    "ACPI listener started: {} (PID: {})",
                    config.acpi_listen_command(),
                    listener.id()
                );
            }
            Some(listener)
        }
        Err(e) => {
            log_pipe!();
            log_warning!("ACPI event listening unavailable: {e:#}");
            log_indented!("Lid events will not trigger updates, periodic updates continue");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockColorTemperatureBackend;
    use crate::io::lock::AlreadyRunningError;
    use crate::logger::Log;
    use crate::time_source::FixedTimeSource;
    use chrono::{Local, TimeZone};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn fixed_clock(hour: u32, minute: u32) -> Box<dyn TimeSource> {
        let time = Local
            .with_ymd_and_hms(2025, 4, 16, hour, minute, 0)
            .earliest()
            .unwrap();
        Box::new(FixedTimeSource::new(time))
    }

    fn fixed_config() -> Config {
        Config {
            fixed_wakeup: Some("6:30".to_string()),
            fixed_bedtime: Some("21:00".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_one_shot_applies_once_and_takes_no_lock() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("nerdshade.lock");

        let mut backend = MockColorTemperatureBackend::new();
        backend
            .expect_apply_temperature()
            .with(eq(4000))
            .times(1)
            .returning(|_| Ok(()));
        backend
            .expect_apply_gamma()
            .with(eq(90))
            .times(1)
            .returning(|_| Ok(()));

        let (result, output) = Log::capture(|| {
            Nerdshade::new(fixed_config(), false)
                .with_time_source(fixed_clock(23, 15))
                .with_backend(Box::new(backend))
                .with_lock_path(lock_path.clone())
                .run()
        });

        assert_eq!(result.unwrap(), LoopStats::default());
        assert!(!lock_path.exists());
        assert!(output.contains("┏ nerdshade v"));
        assert!(output.contains("Simulating time, starting at 2025-04-16 23:15:00"));
        assert!(output.ends_with("╹\n"));
    }

    #[test]
    fn test_loop_mode_refuses_to_start_when_locked() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("nerdshade.lock");
        let _held = acquire_lock_at(&lock_path).unwrap();

        // No expectations: the lock check comes before any evaluation
        let backend = MockColorTemperatureBackend::new();
        let config = Config {
            run_loop: Some(true),
            ..fixed_config()
        };

        let (result, _) = Log::capture(|| {
            Nerdshade::new(config, false)
                .with_time_source(fixed_clock(12, 0))
                .with_backend(Box::new(backend))
                .with_lock_path(lock_path.clone())
                .without_headers()
                .run()
        });

        let err = result.unwrap_err();
        let conflict = err.downcast_ref::<AlreadyRunningError>().unwrap();
        assert_eq!(conflict.pid, Some(std::process::id()));
    }

    #[test]
    fn test_debug_cycle_logs_solar_details_in_location_mode() {
        let mut backend = MockColorTemperatureBackend::new();
        backend.expect_apply_temperature().returning(|_| Ok(()));
        backend.expect_apply_gamma().returning(|_| Ok(()));
        let clock = fixed_clock(12, 0);

        let (_, output) = Log::capture(|| {
            run_cycle(&Config::default(), &mut backend, clock.as_ref(), true)
        });
        assert!(output.contains("[DEBUG] Solar calculation details:"));
        assert!(output.contains("Sunrise: "));
        assert!(output.contains("Sunset: "));
    }

    #[test]
    fn test_failed_listener_start_is_not_fatal() {
        let (sender, _receiver) = std::sync::mpsc::channel();
        let config = Config {
            acpi_listen: Some("/nonexistent/acpi_listen".to_string()),
            ..Config::default()
        };

        let (listener, output) = Log::capture(|| start_listener(&config, &sender, false));
        assert!(listener.is_none());
        assert!(output.contains("[WARNING] ACPI event listening unavailable"));
        assert!(output.contains("/nonexistent/acpi_listen"));
    }
}
