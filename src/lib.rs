//! # Nerdshade Library
//!
//! Internal library for the nerdshade binary application.
//!
//! This library exists to enable testing of the internals and provide clean separation
//! between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Nerdshade` runner handles one-shot and loop mode lifecycles
//! - **Core Logic**: `core` module with the brightness model, schedule resolution,
//!   the evaluation cycle and the update loop
//! - **Backends**: `backend` module driving hyprsunset through `hyprctl`
//! - **Configuration**: `config` module for layered TOML and command-line settings
//! - **Geographic**: `geo` module for sunrise/sunset calculation
//! - **Infrastructure**: signal handling, ACPI events, the instance lock, logging and time sources

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod backend;
pub mod common;
pub mod config;
pub mod core;
pub mod geo;
pub mod io;
pub mod time_source;

mod nerdshade;

// Re-export for binary
pub use nerdshade::Nerdshade;
