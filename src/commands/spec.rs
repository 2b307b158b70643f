//! `statecraft spec`

use std::io::{self, Write};

use super::CommandStatus;

/// Board format reference shipped with the binary.
pub const BOARD_FORMAT: &str = include_str!("../../docs/board-format.md");

/// Prints the board format reference, always ending with a newline.
pub fn spec<O: Write>(out: &mut O) -> io::Result<CommandStatus> {
    out.write_all(BOARD_FORMAT.as_bytes())?;
    if !BOARD_FORMAT.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(CommandStatus::Success)
}
