//! Shared helpers for duration parsing and display.

use anyhow::{Result, bail};
use std::time::Duration;

/// Parse a duration string such as `"1h10m"`, `"45m"`, `"30s"`, `"1.5h"` or `"500ms"`.
///
/// A duration is a sequence of decimal numbers, each followed by a unit
/// (`h`, `m`, `s` or `ms`). The bare string `"0"` is accepted as zero.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        bail!("Invalid duration \"{input}\": empty value");
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_secs = 0.0_f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            bail!("Invalid duration \"{input}\": expected a number before \"{rest}\"");
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration \"{input}\": bad number"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let factor = match &rest[..unit_len] {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 0.001,
            "" => bail!("Invalid duration \"{input}\": missing unit (use h, m, s or ms)"),
            unit => bail!("Invalid duration \"{input}\": unknown unit \"{unit}\""),
        };
        rest = &rest[unit_len..];
        total_secs += value * factor;
    }

    Duration::try_from_secs_f64(total_secs)
        .map_err(|e| anyhow::anyhow!("Invalid duration \"{input}\": {e}"))
}

/// Format a duration compactly, e.g. `1h10m`, `45m`, `30s` or `250ms`.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    if total_seconds == 0 {
        return format!("{}ms", duration.as_millis());
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    out
}
