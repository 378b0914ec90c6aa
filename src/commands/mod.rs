//! Command handlers for CLI subcommands.
//!
//! Implementations for each subcommand, keeping argument parsing separate
//! from command execution.

pub mod check;
pub mod init;
pub mod total;

pub use check::{run_check, CheckOptions, CheckOutcome};
pub use init::init_config;
pub use total::run_total;
