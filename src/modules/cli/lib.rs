//! confgen CLI
//!
//! This crate provides the command-line interface for confgen including:
//! - validate: Parse and validate a unified configuration
//! - generate: Write every backend configuration the platform needs

pub mod commands;

pub use commands::{Cli, Commands};
