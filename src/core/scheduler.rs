//! Periodic re-evaluation loop.
//!
//! Waits on the signal channel with a timeout equal to the time left until the
//! next tick, so ticks, shutdown requests and external events are all handled
//! from one blocking call without busy polling.
//!
//! Ticks keep a fixed phase relative to the loop start: with a 30s interval
//! they fire at 30s, 60s, 90s and so on, regardless of how many event-driven
//! evaluations happened in between. Ticks that were missed because the
//! callback ran long are skipped rather than replayed. A tick that is due
//! when the shutdown is observed still runs before the loop returns.

use std::fmt;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use crate::io::signals::{SignalMessage, SignalState};

/// Why the callback is being invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The regular interval elapsed.
    Tick,
    /// An external event arrived, carrying its text.
    Event(String),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Tick => write!(f, "tick"),
            Trigger::Event(line) => write!(f, "event \"{line}\""),
        }
    }
}

/// Number of callback invocations performed by a loop run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub events: u64,
}

/// Invoke `callback` every `interval` and on every external event until a
/// shutdown is requested.
///
/// The callback is not invoked on entry; callers that want an immediate
/// evaluation run it themselves before entering the loop. The loop returns
/// when a [`SignalMessage::Shutdown`] arrives, when `signal_state.running` is
/// cleared, or when every sender of the channel is gone.
pub fn repeat_until_interrupt<F>(
    callback: F,
    interval: Duration,
    signal_state: &SignalState,
    debug_enabled: bool,
) -> LoopStats
where
    F: FnMut(Trigger),
{
    repeat_until_interrupt_from(
        Instant::now(),
        callback,
        interval,
        signal_state,
        debug_enabled,
    )
}

/// Like [`repeat_until_interrupt`], with ticks anchored at `start`.
///
/// Ticks fall due at `start + n * interval`. A tick that is due by the time
/// the shutdown is observed still runs before the loop returns, so a shutdown
/// at exactly `start + n * interval` yields `n` tick invocations.
pub fn repeat_until_interrupt_from<F>(
    start: Instant,
    mut callback: F,
    interval: Duration,
    signal_state: &SignalState,
    debug_enabled: bool,
) -> LoopStats
where
    F: FnMut(Trigger),
{
    // Zero would spin
    let interval = interval.max(Duration::from_millis(1));

    let mut stats = LoopStats::default();
    let mut next_tick = start + interval;

    while signal_state.is_running() {
        let now = Instant::now();

        if now >= next_tick {
            callback(Trigger::Tick);
            stats.ticks += 1;

            let finished = Instant::now();
            let mut skipped = 0u64;
            next_tick += interval;
            while next_tick <= finished {
                next_tick += interval;
                skipped += 1;
            }
            if skipped > 0 && debug_enabled {
                log_debug!("Skipped {skipped} missed tick(s)");
            }
            continue;
        }

        match signal_state.signal_receiver.recv_timeout(next_tick - now) {
            Ok(SignalMessage::Shutdown) => {
                if debug_enabled {
                    log_debug!("Shutdown requested, leaving loop");
                }
                break;
            }
            Ok(SignalMessage::ExternalEvent(line)) => {
                if !signal_state.is_running() {
                    break;
                }
                callback(Trigger::Event(line));
                stats.events += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // The shutdown and the tick deadline can race; the tick wins
    if Instant::now() >= next_tick {
        if debug_enabled {
            log_debug!("Running tick that fell due during shutdown");
        }
        callback(Trigger::Tick);
        stats.ticks += 1;
    }

    stats
}
