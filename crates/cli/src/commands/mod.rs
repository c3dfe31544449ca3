//! CLI subcommand implementations.

pub mod append;
pub mod clear;
pub mod config_cmd;
pub mod context;
pub mod init;
pub mod log;
pub mod search;
pub mod stats;
