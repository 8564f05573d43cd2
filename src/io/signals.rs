//! Signal handling and the shared message channel.
//!
//! Every asynchronous source (the OS signal thread, the ACPI listener) talks to
//! the main loop through one mpsc channel of [`SignalMessage`]s. The main loop
//! blocks on that channel between ticks, so a shutdown request wakes it
//! immediately instead of after the next interval.

use anyhow::{Context, Result};
use nix::sys::signal::Signal;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc::{Receiver, Sender},
    thread,
};

/// Unified message type for everything that can wake the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Terminate the loop (SIGINT, SIGTERM).
    Shutdown,
    /// An external event line that should trigger an immediate evaluation.
    ExternalEvent(String),
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Cleared once a shutdown has been requested
    pub running: Arc<AtomicBool>,
    /// Channel receiver drained by the main loop
    pub signal_receiver: Receiver<SignalMessage>,
    /// Cloned by event sources that post into the main loop
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// A state with a fresh channel and no OS signal handler attached.
    pub fn new() -> Self {
        let (signal_sender, signal_receiver) = std::sync::mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    /// Request a shutdown from inside the process.
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.signal_sender.send(SignalMessage::Shutdown);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Human readable name for a raw signal number.
pub fn signal_name(sig: i32) -> String {
    Signal::try_from(sig)
        .map(|signal| signal.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {sig}"))
}

/// Set up SIGINT/SIGTERM handling.
///
/// Spawns a background thread that waits for a termination signal, clears the
/// `running` flag and posts [`SignalMessage::Shutdown`]. Only the first signal
/// is acted upon; the thread exits afterwards.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::new();

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;

    let running_clone = state.running.clone();
    let signal_sender_clone = state.signal_sender.clone();

    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            log_pipe!();
            if debug_enabled {
                log_info!(
                    "Received {}, initiating graceful shutdown...",
                    signal_name(sig)
                );
            } else {
                log_info!("Received interrupt signal, initiating graceful shutdown...");
            }

            // Flag first so a loop polling `running` sees it even if the send fails
            running_clone.store(false, Ordering::SeqCst);

            if let Err(e) = signal_sender_clone.send(SignalMessage::Shutdown) {
                log_warning!("Failed to send shutdown message: {e}");
                log_indented!("Main loop appears to have already exited");
            }
        }
    });

    Ok(state)
}
