//! Board Definition Module
//!
//! Data structures and the parse → validate → summarize pipeline for
//! board files.
//!
//! # Structure
//!
//! - [`model`]: Core data structures (Board, Column, Task)
//! - [`parser`]: YAML parsing and loading
//! - [`validator`]: Structural rules and dependency checking
//! - [`summary`]: Deterministic text summary

pub mod model;
pub mod parser;
pub mod summary;
pub mod validator;

pub use model::{Board, Column, Task};
pub use parser::{load_board, parse_board, parse_board_from_str, ParseError};
pub use summary::summarize;
pub use validator::{
    check_spec_files, validate, validate_board, ErrorCode, ValidationError, ValidationResult,
    CANONICAL_COLUMNS,
};
