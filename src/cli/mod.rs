//! Command-line interface for labelforge.
//!
//! Provides commands for labeling assignment, review assignment, pool
//! inspection and snapshot validation.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
