use super::validation::validate_config;
use super::*;
use crate::common::constants::CONFIG_FILE_NAME;
use crate::core::schedule::ScheduleSource;
use crate::logger::Log;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, content: &str) {
    fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = tempdir().unwrap();
    let config = load(Some(temp_dir.path())).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.night_temp(), 4000);
    assert_eq!(config.day_temp(), 6500);
    assert_eq!(config.night_gamma(), 90);
    assert_eq!(config.day_gamma(), 100);
    assert_eq!(config.transition_duration().unwrap(), Duration::from_secs(3600));
    assert_eq!(config.update_interval().unwrap(), Duration::from_secs(30));
    assert!(!config.run_loop());
    assert_eq!(config.hyprctl_command(), "hyprctl");
    assert!(config.acpi_events());
    assert_eq!(config.acpi_listen_command(), "acpi_listen");
    assert_eq!(config.acpi_event_filter(), "button/lid LID open");
    assert_eq!(
        config.schedule_source(),
        ScheduleSource::Location {
            latitude: 48.516,
            longitude: 9.120
        }
    );
}

#[test]
fn test_load_full_file() {
    let temp_dir = tempdir().unwrap();
    write_config(
        temp_dir.path(),
        r#"
night_temp = 3300
day_temp = 6000
night_gamma = 85
day_gamma = 95
latitude = 52.52
longitude = 13.405
transition_duration = "45m"
update_interval = "1m"
loop = true
hyprctl = "/usr/bin/hyprctl"
acpi_events = false
acpi_listen = "acpi_listen -t 5"
acpi_event = ""
"#,
    );

    let config = load(Some(temp_dir.path())).unwrap();
    assert_eq!(config.night_temp(), 3300);
    assert_eq!(config.day_temp(), 6000);
    assert_eq!(config.night_gamma(), 85);
    assert_eq!(config.day_gamma(), 95);
    assert_eq!(config.transition_duration().unwrap(), Duration::from_secs(2700));
    assert_eq!(config.update_interval().unwrap(), Duration::from_secs(60));
    assert!(config.run_loop());
    assert_eq!(config.hyprctl_command(), "/usr/bin/hyprctl");
    assert!(!config.acpi_events());
    assert_eq!(config.acpi_listen_command(), "acpi_listen -t 5");
    assert_eq!(config.acpi_event_filter(), "");
    assert_eq!(
        config.schedule_source(),
        ScheduleSource::Location {
            latitude: 52.52,
            longitude: 13.405
        }
    );
}

#[test]
fn test_fixed_schedule_from_file() {
    let temp_dir = tempdir().unwrap();
    write_config(
        temp_dir.path(),
        "fixed_wakeup = \"6:30\"\nfixed_bedtime = \"22:15\"\n",
    );

    let config = load_with_overrides(Some(temp_dir.path()), &Config::default()).unwrap();
    assert_eq!(
        config.schedule_source(),
        ScheduleSource::Fixed {
            wakeup: "6:30".to_string(),
            bedtime: "22:15".to_string()
        }
    );
}

#[test]
fn test_unknown_key_is_rejected() {
    let temp_dir = tempdir().unwrap();
    write_config(temp_dir.path(), "nigth_temp = 3000\n");

    let err = load(Some(temp_dir.path())).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
    assert!(format!("{err:#}").contains("nigth_temp"));
}

#[test]
fn test_wrong_type_is_rejected() {
    let temp_dir = tempdir().unwrap();
    write_config(temp_dir.path(), "night_temp = \"warm\"\n");
    assert!(load(Some(temp_dir.path())).is_err());
}

#[test]
fn test_command_line_overrides_file() {
    let temp_dir = tempdir().unwrap();
    write_config(
        temp_dir.path(),
        "night_temp = 3300\nday_temp = 6000\nloop = false\n",
    );

    let overrides = Config {
        night_temp: Some(2700),
        run_loop: Some(true),
        ..Config::default()
    };
    let config = load_with_overrides(Some(temp_dir.path()), &overrides).unwrap();

    assert_eq!(config.night_temp(), 2700);
    assert_eq!(config.day_temp(), 6000);
    assert!(config.run_loop());
}

#[test]
fn test_merge_keeps_base_when_override_unset() {
    let base = Config {
        latitude: Some(10.0),
        hyprctl: Some("base".to_string()),
        ..Config::default()
    };
    let overrides = Config {
        hyprctl: Some("override".to_string()),
        ..Config::default()
    };
    let merged = base.merge(&overrides);
    assert_eq!(merged.latitude, Some(10.0));
    assert_eq!(merged.hyprctl.as_deref(), Some("override"));
}

#[test]
fn test_validation_requires_both_fixed_times() {
    let only_wakeup = Config {
        fixed_wakeup: Some("6:00".to_string()),
        ..Config::default()
    };
    let err = validate_config(&only_wakeup).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Both --fixed-bedtime and --fixed-wakeup need to be supplied"
    );

    let only_bedtime = Config {
        fixed_bedtime: Some("22:00".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&only_bedtime).is_err());
}

#[test]
fn test_validation_accepts_defaults_and_full_schedule() {
    assert!(validate_config(&Config::default()).is_ok());

    let both = Config {
        fixed_wakeup: Some("6:00".to_string()),
        fixed_bedtime: Some("22:00".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&both).is_ok());
}

#[test]
fn test_validation_malformed_fixed_time_is_not_fatal() {
    // Parsed per evaluation cycle, so a bad value only fails those cycles
    let config = Config {
        fixed_wakeup: Some("630".to_string()),
        fixed_bedtime: Some("22:00".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_validation_coordinate_ranges() {
    for (lat, lon, ok) in [
        (90.0, 180.0, true),
        (-90.0, -180.0, true),
        (90.1, 0.0, false),
        (-91.0, 0.0, false),
        (0.0, 180.5, false),
        (0.0, -200.0, false),
    ] {
        let config = Config {
            latitude: Some(lat),
            longitude: Some(lon),
            ..Config::default()
        };
        assert_eq!(validate_config(&config).is_ok(), ok, "lat {lat} lon {lon}");
    }
}

#[test]
fn test_validation_durations() {
    let zero_transition = Config {
        transition_duration: Some("0s".to_string()),
        ..Config::default()
    };
    assert_eq!(
        validate_config(&zero_transition).unwrap_err().to_string(),
        "transition_duration must be greater than zero"
    );

    let zero_interval = Config {
        update_interval: Some("0".to_string()),
        ..Config::default()
    };
    assert_eq!(
        validate_config(&zero_interval).unwrap_err().to_string(),
        "update_interval must be greater than zero"
    );

    let garbage = Config {
        transition_duration: Some("soon".to_string()),
        ..Config::default()
    };
    assert_eq!(
        validate_config(&garbage).unwrap_err().to_string(),
        "Invalid transition_duration"
    );
}

#[test]
fn test_validation_empty_commands() {
    let config = Config {
        hyprctl: Some("  ".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&config).is_err());

    let acpi_disabled = Config {
        acpi_events: Some(false),
        acpi_listen: Some(String::new()),
        ..Config::default()
    };
    assert!(validate_config(&acpi_disabled).is_ok());
}

#[test]
fn test_custom_dir_path() {
    let temp_dir = tempdir().unwrap();
    assert_eq!(
        get_config_path(Some(temp_dir.path())).unwrap(),
        temp_dir.path().join("nerdshade.toml")
    );
}

#[test]
#[serial]
fn test_default_dir_follows_xdg_config_home() {
    let temp_dir = tempdir().unwrap();

    // Save and restore XDG_CONFIG_HOME
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let path = get_config_path(None);

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    assert_eq!(
        path.unwrap(),
        temp_dir.path().join("nerdshade").join("nerdshade.toml")
    );
}

#[test]
fn test_log_config_location_mode() {
    let config = Config {
        run_loop: Some(true),
        ..Config::default()
    };
    let (_, output) = Log::capture(|| config.log_config("default configuration"));

    assert!(output.contains("┣ Loaded default configuration"));
    assert!(output.contains("Mode: location (48.5160°N, 9.1200°E)"));
    assert!(output.contains("Night: 4000K @ 90% gamma"));
    assert!(output.contains("Transition duration: 1h"));
    assert!(output.contains("Update interval: 30s"));
    assert!(output.contains("ACPI events: acpi_listen (button/lid LID open)"));
}

#[test]
fn test_log_config_fixed_mode_one_shot() {
    let config = Config {
        fixed_wakeup: Some("6:00".to_string()),
        fixed_bedtime: Some("22:30".to_string()),
        ..Config::default()
    };
    let (_, output) = Log::capture(|| config.log_config("default configuration"));

    assert!(output.contains("Mode: fixed schedule"));
    assert!(output.contains("Bedtime: 22:30"));
    assert!(!output.contains("Update interval"));
}

#[test]
fn test_validation_rejects_transition_longer_than_a_day() {
    let huge = Config {
        transition_duration: Some("10000000000h".to_string()),
        ..Config::default()
    };
    assert_eq!(
        validate_config(&huge).unwrap_err().to_string(),
        "transition_duration must be at most 24h"
    );

    let whole_day = Config {
        transition_duration: Some("24h".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&whole_day).is_ok());
}

#[test]
fn test_oversized_transition_in_file_fails_startup() {
    let temp_dir = tempdir().unwrap();
    write_config(temp_dir.path(), "transition_duration = \"10000000000h\"\n");

    let err = load_with_overrides(Some(temp_dir.path()), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("transition_duration must be at most"));
}

#[test]
fn test_blank_fixed_time_counts_as_missing() {
    let blank_bedtime = Config {
        fixed_wakeup: Some("6:00".to_string()),
        fixed_bedtime: Some("  ".to_string()),
        ..Config::default()
    };
    assert_eq!(
        validate_config(&blank_bedtime).unwrap_err().to_string(),
        "Both --fixed-bedtime and --fixed-wakeup need to be supplied"
    );

    let both_blank = Config {
        fixed_wakeup: Some(String::new()),
        fixed_bedtime: Some(String::new()),
        ..Config::default()
    };
    assert!(validate_config(&both_blank).is_ok());
    assert_eq!(
        both_blank.schedule_source(),
        ScheduleSource::Location {
            latitude: 48.516,
            longitude: 9.120
        }
    );
}
