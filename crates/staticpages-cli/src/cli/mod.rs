//! # CLI Layer
//!
//! One possible UI client for staticpages. It is the only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap derive types in [`setup`]
//! 2. **Context Setup**: logging, configuration and the API facade in [`commands`]
//! 3. **Output Formatting**: plain-text and JSON views in [`render`]

pub mod commands;
pub mod render;
pub mod setup;

pub use commands::run;
