//! ACPI event listening.
//!
//! Spawns an `acpi_listen`-style child process and reads its stdout line by
//! line on a dedicated thread. Matching lines are posted to the main loop as
//! [`SignalMessage::ExternalEvent`], which triggers an immediate evaluation.
//!
//! Lines look like:
//!
//! ```text
//! button/lid LID close
//! button/lid LID open
//! video/brightnessdown BRTDN 00000087 00000000
//! ```

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::io::signals::SignalMessage;

/// A running listener process.
///
/// Dropping the handle kills the child process and joins the reader thread.
pub struct AcpiListener {
    child: Child,
    reader: Option<JoinHandle<()>>,
}

impl AcpiListener {
    /// Process id of the listener child.
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl Drop for AcpiListener {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

/// Whether `line` passes the event filter. An empty filter accepts every line.
pub fn event_matches(line: &str, filter: &str) -> bool {
    filter.is_empty() || line == filter
}

/// Start `command` and forward its matching output lines to `sender`.
///
/// The command's stdout is replaced with a pipe. Failing to start the process
/// is reported as an error; the caller decides whether that is fatal. The
/// reader thread ends when the process closes its stdout or when the main
/// loop's receiver is gone.
pub fn start_event_listener(
    mut command: Command,
    filter: &str,
    sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<AcpiListener> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start event listener '{program}'"))?;

    let stdout = child
        .stdout
        .take()
        .context("event listener stdout was not captured")?;

    let filter = filter.to_string();
    let reader = thread::Builder::new()
        .name("acpi-listener".to_string())
        .spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else {
                    break;
                };
                if !event_matches(&line, &filter) {
                    continue;
                }
                if debug_enabled {
                    log_pipe!();
                    log_debug!("ACPI event: {line}");
                }
                if sender.send(SignalMessage::ExternalEvent(line)).is_err() {
                    break;
                }
            }
        });

    let reader = match reader {
        Ok(handle) => handle,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e).context("failed to spawn event listener thread");
        }
    };

    Ok(AcpiListener {
        child,
        reader: Some(reader),
    })
}

/// Start an `acpi_listen` command line, split on whitespace into program and arguments.
pub fn start_acpi_listener(
    command_line: &str,
    filter: &str,
    sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<AcpiListener> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .context("ACPI listener command is empty")?;
    let mut command = Command::new(program);
    command.args(parts);
    start_event_listener(command, filter, sender, debug_enabled)
}
