//! # CLI Layer
//!
//! This module is **one possible display layer** for wishapp. It is the only
//! place that:
//! - Parses arguments
//! - Writes to stdout/stderr
//! - Installs the logging subscriber
//! - Owns the async runtime
//!
//! ## Structure
//!
//! - [`setup`]: clap definitions
//! - [`commands`]: `run()`, context setup, per-command handlers
//! - [`render`]: turning `CmdResult` values into terminal output

mod commands;
mod render;
mod setup;

pub use commands::run;
