//! Structured logging system with visual formatting.
//!
//! This module provides the logging macros used throughout nerdshade. Output uses
//! Unicode box drawing characters so that a long-running loop produces one
//! continuous, readable block of log lines.
//!
//! Output normally goes to stdout. Tests can redirect everything logged on the
//! current thread into a buffer with [`Log::capture`], which keeps log assertions
//! independent from other tests running in parallel.

use std::cell::RefCell;
use std::io::Write;

thread_local! {
    // Per-thread capture buffer installed by Log::capture
    static CAPTURE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: starts a new conceptual block (startup, mode selection,
///   shutdown). Prints an empty pipe `┃` for spacing, then `┣ message`.
/// - **`log_decorated!`**: a line belonging to the current block, `┣ message`.
/// - **`log_indented!`**: nested detail under the previous line, `┃   message`.
/// - **`log_pipe!`**: a single empty `┃` line, used before a semantic level message
///   that starts its own block.
/// - **`log_version!`** / **`log_end!`**: header and final marker, printed once each.
/// - **`log_info!`, `log_warning!`, `log_debug!`, `log_error_exit!`**:
///   semantic messages with a colored `[LEVEL]` prefix.
///
/// Debug messages are not filtered here. Callers receive an explicit
/// `debug_enabled` flag and decide whether to emit them.
pub struct Log;

impl Log {
    /// Run `f` and return its result together with everything it logged on this thread.
    ///
    /// ANSI color codes are stripped from the captured text. Messages logged from
    /// other threads are not captured and go to stdout as usual. Captures can nest;
    /// the inner capture sees only its own output.
    pub fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
        let previous = CAPTURE.with(|c| c.borrow_mut().replace(String::new()));
        let result = f();
        let captured = CAPTURE.with(|c| {
            let mut slot = c.borrow_mut();
            let captured = slot.take().unwrap_or_default();
            *slot = previous;
            captured
        });
        (result, captured)
    }
}

// Helper function to strip ANSI color codes from text
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next(); // consume '['
                // Skip until we find 'm'
                for ch in chars.by_ref() {
                    if ch == 'm' {
                        break;
                    }
                }
            } else {
                result.push(ch);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    let captured = CAPTURE.with(|c| match c.borrow_mut().as_mut() {
        Some(buffer) => {
            buffer.push_str(&strip_ansi_codes(text));
            true
        }
        None => false,
    });

    if !captured {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┣ {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┣ {expr}\n"));
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┃   {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┃   {expr}\n"));
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        $crate::logger::write_output("┃\n");
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┃\n┣ {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┃\n┣ {expr}\n"));
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        let version = env!("CARGO_PKG_VERSION");
        $crate::logger::write_output(&format!("┏ nerdshade v{version} ━━╸\n"));
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        $crate::logger::write_output("╹\n");
    }};
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┣[\x1b[33mWARNING\x1b[0m] {expr}\n"));
    }};
}

/// Log an error message that terminates the log flow.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┃\n┗[\x1b[31mERROR\x1b[0m] {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┃\n┗[\x1b[31mERROR\x1b[0m] {expr}\n"));
    }};
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┣[\x1b[32mINFO\x1b[0m] {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┣[\x1b[32mINFO\x1b[0m] {expr}\n"));
    }};
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("┣[\x1b[32mDEBUG\x1b[0m] {message}\n"));
    }};
    ($expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("┣[\x1b[32mDEBUG\x1b[0m] {expr}\n"));
    }};
}
