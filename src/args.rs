//! Command-line argument parsing.
//!
//! Flags map onto the same [`Config`] fields as the configuration file and are
//! merged on top of it. Parsing never exits the process: invalid input is
//! reported with a warning and turned into [`CliAction::ShowHelpDueToError`],
//! leaving the exit decision to `main`.

use crate::config::Config;

/// What the process should do after parsing arguments.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Evaluate (and possibly loop) with the given command-line overrides.
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// `--at`, evaluate as if the clock started at this local time
        at: Option<String>,
        overrides: Config,
    },
    ShowHelp,
    ShowVersion,
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Split `--flag=value` into its parts.
fn split_inline_value(arg: &str) -> (&str, Option<&str>) {
    if arg.starts_with("--")
        && let Some((flag, value)) = arg.split_once('=')
    {
        return (flag, Some(value));
    }
    (arg, None)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Option<T> {
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log_warning!("Invalid value for {flag}: {value}");
            None
        }
    }
}

impl ParsedArgs {
    /// Parse an argument list whose first element is the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut at: Option<String> = None;
        let mut overrides = Config::default();

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let (flag, inline_value) = split_inline_value(&args_vec[i]);

            let is_switch = match flag {
                "--help" | "-h" => {
                    display_help = true;
                    true
                }
                "--version" | "-V" => {
                    display_version = true;
                    true
                }
                "--debug" | "-d" => {
                    debug_enabled = true;
                    true
                }
                "--loop" | "-l" => {
                    overrides.run_loop = Some(true);
                    true
                }
                "--no-acpi" => {
                    overrides.acpi_events = Some(false);
                    true
                }
                _ => false,
            };
            if is_switch {
                if inline_value.is_some() {
                    log_warning!("Option {flag} does not take a value");
                    unknown_arg_found = true;
                }
                i += 1;
                continue;
            }

            let takes_value = matches!(
                flag,
                "--config"
                    | "-c"
                    | "--temp-night"
                    | "--temp-day"
                    | "--gamma-night"
                    | "--gamma-day"
                    | "--latitude"
                    | "--longitude"
                    | "--fixed-wakeup"
                    | "--fixed-bedtime"
                    | "--transition-duration"
                    | "--interval"
                    | "--hyprctl"
                    | "--acpi-listen"
                    | "--acpi-event"
                    | "--at"
            );

            if !takes_value {
                if flag.starts_with('-') {
                    log_warning!("Unknown option: {}", args_vec[i]);
                } else {
                    log_warning!("Unexpected argument: {}", args_vec[i]);
                }
                unknown_arg_found = true;
                i += 1;
                continue;
            }

            // Value from `--flag=value` or the following argument
            let value = match inline_value {
                Some(value) => value.to_string(),
                None if i + 1 < args_vec.len() => {
                    i += 1;
                    args_vec[i].clone()
                }
                None => {
                    log_warning!("Missing value for {flag}");
                    unknown_arg_found = true;
                    i += 1;
                    continue;
                }
            };

            match flag {
                "--config" | "-c" => config_dir = Some(value),
                "--temp-night" => match parse_number(flag, &value) {
                    Some(v) => overrides.night_temp = Some(v),
                    None => unknown_arg_found = true,
                },
                "--temp-day" => match parse_number(flag, &value) {
                    Some(v) => overrides.day_temp = Some(v),
                    None => unknown_arg_found = true,
                },
                "--gamma-night" => match parse_number(flag, &value) {
                    Some(v) => overrides.night_gamma = Some(v),
                    None => unknown_arg_found = true,
                },
                "--gamma-day" => match parse_number(flag, &value) {
                    Some(v) => overrides.day_gamma = Some(v),
                    None => unknown_arg_found = true,
                },
                "--latitude" => match parse_number(flag, &value) {
                    Some(v) => overrides.latitude = Some(v),
                    None => unknown_arg_found = true,
                },
                "--longitude" => match parse_number(flag, &value) {
                    Some(v) => overrides.longitude = Some(v),
                    None => unknown_arg_found = true,
                },
                "--fixed-wakeup" => overrides.fixed_wakeup = Some(value),
                "--fixed-bedtime" => overrides.fixed_bedtime = Some(value),
                "--transition-duration" => overrides.transition_duration = Some(value),
                "--interval" => overrides.update_interval = Some(value),
                "--hyprctl" => overrides.hyprctl = Some(value),
                "--acpi-listen" => overrides.acpi_listen = Some(value),
                "--acpi-event" => overrides.acpi_event = Some(value),
                "--at" => at = Some(value),
                _ => {
                    log_warning!("Unknown option: {flag}");
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        // Determine the action based on parsed flags
        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
                at,
                overrides,
            }
        };

        ParsedArgs { action }
    }

    /// Parse the arguments of the current process.
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!("{}", env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("nerdshade [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>              Use custom configuration directory");
    log_indented!("-d, --debug                     Enable detailed debug output");
    log_indented!("-h, --help                      Print help information");
    log_indented!("-l, --loop                      Keep running and re-evaluate periodically");
    log_indented!("-V, --version                   Print version information");
    log_block_start!("Output ranges:");
    log_indented!("--temp-night <K>                Night color temperature (default 4000)");
    log_indented!("--temp-day <K>                  Day color temperature (default 6500)");
    log_indented!("--gamma-night <%>               Night gamma (default 90)");
    log_indented!("--gamma-day <%>                 Day gamma (default 100)");
    log_block_start!("Schedule:");
    log_indented!("--latitude <deg>                Your location latitude (default 48.516)");
    log_indented!("--longitude <deg>               Your location longitude (default 9.120)");
    log_indented!("--fixed-wakeup <HH:MM>          Wakeup time, e.g. \"6:00\" (overrides location)");
    log_indented!("--fixed-bedtime <HH:MM>         Bedtime, e.g. \"22:30\" (overrides location)");
    log_indented!("--transition-duration <dur>     Ramp length, e.g. \"45m\" or \"1h10m\" (default 1h)");
    log_indented!("--at \"YYYY-MM-DD HH:MM:SS\"      Evaluate as if it were this local time");
    log_block_start!("Loop mode:");
    log_indented!("--interval <dur>                Time between evaluations (default 30s)");
    log_indented!("--hyprctl <cmd>                 hyprctl command (default hyprctl)");
    log_indented!("--acpi-listen <cmd>             ACPI event listener (default acpi_listen)");
    log_indented!("--acpi-event <line>             Event that triggers re-evaluation");
    log_indented!("                                (default \"button/lid LID open\", \"\" = any)");
    log_indented!("--no-acpi                       Do not listen for ACPI events");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;

    fn run_action(args: &[&str]) -> CliAction {
        ParsedArgs::parse(std::iter::once("nerdshade").chain(args.iter().copied())).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            run_action(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
                at: None,
                overrides: Config::default(),
            }
        );
    }

    #[test]
    fn test_parse_debug_and_loop() {
        let CliAction::Run {
            debug_enabled,
            overrides,
            ..
        } = run_action(&["-d", "--loop"])
        else {
            panic!("expected Run");
        };
        assert!(debug_enabled);
        assert_eq!(overrides.run_loop, Some(true));
    }

    #[test]
    fn test_parse_all_value_flags() {
        let action = run_action(&[
            "--temp-night",
            "3000",
            "--temp-day=6000",
            "--gamma-night",
            "80",
            "--gamma-day",
            "95",
            "--latitude",
            "-33.87",
            "--longitude",
            "151.21",
            "--transition-duration",
            "45m",
            "--interval",
            "10s",
            "--hyprctl",
            "/usr/bin/hyprctl",
            "--acpi-listen",
            "acpi_listen -c",
            "--acpi-event",
            "",
            "--no-acpi",
            "--config",
            "/tmp/nerdshade",
            "--at",
            "2025-04-16 07:25:00",
        ]);

        let expected = Config {
            night_temp: Some(3000),
            day_temp: Some(6000),
            night_gamma: Some(80),
            day_gamma: Some(95),
            latitude: Some(-33.87),
            longitude: Some(151.21),
            transition_duration: Some("45m".to_string()),
            update_interval: Some("10s".to_string()),
            hyprctl: Some("/usr/bin/hyprctl".to_string()),
            acpi_events: Some(false),
            acpi_listen: Some("acpi_listen -c".to_string()),
            acpi_event: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(
            action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: Some("/tmp/nerdshade".to_string()),
                at: Some("2025-04-16 07:25:00".to_string()),
                overrides: expected,
            }
        );
    }

    #[test]
    fn test_parse_fixed_schedule() {
        let CliAction::Run { overrides, .. } =
            run_action(&["--fixed-wakeup", "6:30", "--fixed-bedtime", "22:15"])
        else {
            panic!("expected Run");
        };
        assert_eq!(overrides.fixed_wakeup.as_deref(), Some("6:30"));
        assert_eq!(overrides.fixed_bedtime.as_deref(), Some("22:15"));
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(run_action(&["--help"]), CliAction::ShowHelp);
        assert_eq!(run_action(&["-h"]), CliAction::ShowHelp);
        assert_eq!(run_action(&["-V"]), CliAction::ShowVersion);
        assert_eq!(run_action(&["--version", "--help"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_option() {
        let (action, output) = Log::capture(|| run_action(&["--frobnicate"]));
        assert_eq!(action, CliAction::ShowHelpDueToError);
        assert!(output.contains("[WARNING] Unknown option: --frobnicate"));
    }

    #[test]
    fn test_parse_positional_argument_is_an_error() {
        let (action, output) = Log::capture(|| run_action(&["now"]));
        assert_eq!(action, CliAction::ShowHelpDueToError);
        assert!(output.contains("Unexpected argument: now"));
    }

    #[test]
    fn test_parse_invalid_number() {
        let (action, output) = Log::capture(|| run_action(&["--temp-night", "warm"]));
        assert_eq!(action, CliAction::ShowHelpDueToError);
        assert!(output.contains("Invalid value for --temp-night: warm"));
    }

    #[test]
    fn test_parse_missing_value() {
        let (action, output) = Log::capture(|| run_action(&["--latitude"]));
        assert_eq!(action, CliAction::ShowHelpDueToError);
        assert!(output.contains("Missing value for --latitude"));
    }

    #[test]
    fn test_parse_switch_with_value_is_an_error() {
        let (action, _) = Log::capture(|| run_action(&["--loop=yes"]));
        assert_eq!(action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_help_text_lists_flags() {
        let (_, output) = Log::capture(display_help);
        assert!(output.contains("nerdshade [OPTIONS]"));
        assert!(output.contains("--fixed-wakeup <HH:MM>"));
        assert!(output.contains("--no-acpi"));
        assert!(output.ends_with("╹\n"));
    }

    #[test]
    fn test_version_info() {
        let (_, output) = Log::capture(display_version_info);
        assert!(output.starts_with(&format!("┏ nerdshade v{} ━━╸\n", env!("CARGO_PKG_VERSION"))));
    }
}
