//! hyprctl backend.
//!
//! Applies values by running `<hyprctl> hyprsunset <subcommand> <value>`
//! through `/bin/sh -c`, so the configured command may be a bare program name,
//! a path, or a short command line. Nothing is cached; every call spawns a
//! process.
//!
//! hyprctl reports most usage problems on stdout with a zero exit code, so the
//! exit status is the only failure signal. Stderr is surfaced as a warning and
//! stdout is shown in debug mode.

use anyhow::{Context, Result, bail};
use std::process::Command;

use crate::backend::ColorTemperatureBackend;

/// Captured result of one hyprctl invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyprctlOutput {
    pub stdout: String,
    pub stderr: String,
}

pub struct HyprctlBackend {
    command: String,
    debug_enabled: bool,
}

impl HyprctlBackend {
    pub fn new(command: impl Into<String>, debug_enabled: bool) -> Self {
        Self {
            command: command.into(),
            debug_enabled,
        }
    }

    /// The shell command line for a hyprsunset subcommand.
    pub fn command_line(&self, subcommand: &str, value: i32) -> String {
        format!("{} hyprsunset {subcommand} {value}", self.command)
    }

    /// Run `hyprsunset <subcommand> <value>` and wait for it to finish.
    ///
    /// Fails when the shell cannot be spawned or the command exits non-zero.
    /// A missing hyprctl binary surfaces as exit status 127 from the shell.
    pub fn run_hyprsunset(&self, subcommand: &str, value: i32) -> Result<HyprctlOutput> {
        let command_line = self.command_line(subcommand, value);
        if self.debug_enabled {
            log_debug!("Running: {command_line}");
        }

        let output = Command::new("/bin/sh")
            .arg("-c")
            .arg(&command_line)
            .output()
            .with_context(|| format!("failed to run '{command_line}'"))?;

        let result = HyprctlOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.stderr.is_empty() {
            log_warning!("hyprctl {subcommand}: {}", result.stderr.trim_end());
        }
        if self.debug_enabled {
            log_debug!("hyprctl {subcommand} stdout: {:?}", result.stdout);
        }

        if !output.status.success() {
            bail!("hyprctl {subcommand} failed: {}", output.status);
        }

        Ok(result)
    }
}

impl ColorTemperatureBackend for HyprctlBackend {
    fn apply_temperature(&mut self, temperature: i32) -> Result<()> {
        self.run_hyprsunset("temperature", temperature).map(|_| ())
    }

    fn apply_gamma(&mut self, gamma: i32) -> Result<()> {
        self.run_hyprsunset("gamma", gamma).map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "hyprctl"
    }
}
