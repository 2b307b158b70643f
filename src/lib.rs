//! Statecraft - YAML Task Boards
//!
//! Parses, validates, summarizes, and serves task boards kept as a single
//! YAML file of columns and tasks with dependencies.
//!
//! # Architecture
//!
//! - [`board`]: Data model and the parse → validate → summarize pipeline
//! - [`commands`]: CLI command bodies (validate, summarize, render, spec)
//! - [`server`]: Read-only render server with live file watching
//! - [`config`]: Defaults and render server options
//!
//! # Example
//!
//! ```rust,no_run
//! use statecraft::{load_board, summarize, validate};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let board = load_board("board.yaml")?;
//!
//!     let result = validate(&board);
//!     for error in &result.errors {
//!         eprintln!("{}", error);
//!     }
//!
//!     print!("{}", summarize(&board));
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod commands;
pub mod config;
pub mod server;

// Re-export commonly used types
pub use board::model::{Board, Column, Task};
pub use board::parser::{load_board, parse_board, parse_board_from_str, ParseError};
pub use board::summary::summarize;
pub use board::validator::{validate, validate_board, ValidationError, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "statecraft";
