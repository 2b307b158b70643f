//! CLI command implementations.
//!
//! Each command writes to injected output streams and reports a
//! [`CommandStatus`], so the binary only parses arguments and maps the
//! status to an exit code.

pub mod render;
pub mod spec;
pub mod summarize;
pub mod validate;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub use render::render;
pub use spec::spec;
pub use summarize::summarize;
pub use validate::validate;

/// Result of running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// Commands take a single board file; extra positional paths are an error.
pub fn reject_extra_paths<E: Write>(extra: &[String], err: &mut E) -> io::Result<CommandStatus> {
    if extra.is_empty() {
        return Ok(CommandStatus::Success);
    }
    writeln!(
        err,
        "Only one board file per run. Multiple paths are not supported."
    )?;
    Ok(CommandStatus::Failure)
}

/// Directory that relative `spec` paths resolve against.
pub(crate) fn board_dir(board_path: &Path) -> PathBuf {
    match board_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
