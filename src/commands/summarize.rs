//! `statecraft summarize`

use std::io::{self, Write};
use std::path::Path;

use super::CommandStatus;
use crate::board::{self, load_board};

/// Writes the text summary of the board at `path` to `out`.
pub fn summarize<O: Write, E: Write>(
    path: &Path,
    out: &mut O,
    err: &mut E,
) -> io::Result<CommandStatus> {
    match load_board(path) {
        Ok(board) => {
            out.write_all(board::summarize(&board).as_bytes())?;
            Ok(CommandStatus::Success)
        }
        Err(e) => {
            writeln!(err, "{}", e)?;
            Ok(CommandStatus::Failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_summary_written_to_out() {
        let temp_dir = tempdir().unwrap();
        let board_path = temp_dir.path().join("board.yaml");
        std::fs::write(
            &board_path,
            "board: Empty\ncolumns: [Backlog, Ready, In Progress, Done]\ntasks: {}\n",
        )
        .unwrap();

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = summarize(&board_path, &mut out, &mut err).unwrap();

        assert_eq!(status, CommandStatus::Success);
        assert!(err.is_empty());
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Board: Empty\n"));
        assert!(out.ends_with("  (none)\n"));
    }

    #[test]
    fn test_parse_failure_goes_to_err() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = summarize(Path::new("/nonexistent/board.yaml"), &mut out, &mut err).unwrap();

        assert_eq!(status, CommandStatus::Failure);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }
}
