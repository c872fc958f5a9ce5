//! CLI argument parsing and command dispatch

pub mod args;
pub mod common;
pub mod compose;
pub mod explain;
pub mod init;
pub mod list;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, Command, OutputFormat};
