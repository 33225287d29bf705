//! The `rc` command-line harness: feeds descriptor batches through the
//! orchestrator against a dry-run session and reports one JSON envelope.

pub mod cli;
pub mod commands;
pub mod dry_run;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod styles;
