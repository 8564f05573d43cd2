//! Main application entry point.
//!
//! Parses the command line, then either prints help/version or loads the
//! configuration and hands over to the [`Nerdshade`] runner. Startup errors
//! are reported in the logger's style and exit with status 1.

use anyhow::Result;
use std::path::Path;

use nerdshade::Nerdshade;
use nerdshade::args::{self, CliAction, ParsedArgs};
use nerdshade::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use nerdshade::config::{self, Config};
use nerdshade::time_source::{SkewedTimeSource, parse_local_datetime};
use nerdshade::log_error_exit;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let exit_code = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            EXIT_SUCCESS
        }
        CliAction::ShowHelp => {
            args::display_help();
            EXIT_SUCCESS
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            EXIT_FAILURE
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            at,
            overrides,
        } => match run(debug_enabled, config_dir.as_deref(), at.as_deref(), &overrides) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                // The full chain on one line, e.g. "Failed to parse config: ..."
                log_error_exit!("{e:#}");
                EXIT_FAILURE
            }
        },
    };

    std::process::exit(exit_code);
}

fn run(
    debug_enabled: bool,
    config_dir: Option<&str>,
    at: Option<&str>,
    overrides: &Config,
) -> Result<()> {
    let config = config::load_with_overrides(config_dir.map(Path::new), overrides)?;

    let mut runner = Nerdshade::new(config, debug_enabled);
    if let Some(at) = at {
        let start = parse_local_datetime(at)?;
        runner = runner.with_time_source(Box::new(SkewedTimeSource::starting_at(start)));
    }

    runner.run()?;
    Ok(())
}
