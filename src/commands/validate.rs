//! `statecraft validate`

use std::io::{self, Write};
use std::path::Path;

use log::debug;

use super::{board_dir, CommandStatus};
use crate::board::{self, check_spec_files, load_board};

/// Validates the board at `path`.
///
/// Problems go to `err` as `<path>: <message>` lines; warnings are prefixed
/// with `warning: ` and never fail the run. Parse failures and validation
/// errors yield [`CommandStatus::Failure`].
pub fn validate<E: Write>(path: &Path, err: &mut E) -> io::Result<CommandStatus> {
    let board = match load_board(path) {
        Ok(board) => board,
        Err(e) => {
            writeln!(err, "{}", e)?;
            return Ok(CommandStatus::Failure);
        }
    };

    let result = board::validate(&board).with_warnings(check_spec_files(&board, &board_dir(path)));

    for warning in &result.warnings {
        writeln!(err, "warning: {}", warning)?;
    }

    if !result.valid {
        for error in &result.errors {
            writeln!(err, "{}", error)?;
        }
        return Ok(CommandStatus::Failure);
    }

    debug!("{} is valid", path.display());
    Ok(CommandStatus::Success)
}
