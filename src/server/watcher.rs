//! Board file watching.
//!
//! Watches the directory containing the board file (editors often replace
//! files instead of writing in place) and publishes the file content on a
//! broadcast channel once changes settle.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::ServerError;

/// Keeps the OS watcher and its forwarding task alive. Dropping it stops
/// watching.
pub struct BoardWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl Drop for BoardWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Reads the board file, `None` when missing or unreadable.
pub async fn read_board_content(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("Board file {} unreadable: {}", path.display(), e);
            None
        }
    }
}

/// Starts watching `board_path`.
///
/// After each burst of changes (no further events for `debounce`) the
/// current content is sent on `updates`, or an empty string when the file
/// can no longer be read. Must be called from within a tokio runtime.
pub fn watch_board(
    board_path: &Path,
    debounce: Duration,
    updates: broadcast::Sender<String>,
) -> Result<BoardWatcher, ServerError> {
    let file_name = board_path
        .file_name()
        .map(OsString::from)
        .ok_or_else(|| ServerError::InvalidBoardPath(board_path.to_path_buf()))?;
    let directory = match board_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, mut rx) = mpsc::channel::<()>(100);
    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| match result {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) && event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));

                if relevant {
                    // A full queue already guarantees a pending broadcast.
                    let _ = tx.try_send(());
                }
            }
            Err(e) => error!("Board watch error: {}", e),
        },
        notify::Config::default(),
    )?;
    watcher.watch(&directory, RecursiveMode::NonRecursive)?;
    info!("Watching {} for board changes", directory.display());

    let path = board_path.to_path_buf();
    let task = tokio::spawn(async move {
        while rx.recv().await.is_some() {
            let mut closed = false;
            loop {
                tokio::select! {
                    more = rx.recv() => {
                        if more.is_none() {
                            closed = true;
                            break;
                        }
                    }
                    _ = tokio::time::sleep(debounce) => break,
                }
            }

            let content = read_board_content(&path).await.unwrap_or_default();
            match updates.send(content) {
                Ok(clients) => debug!("Board change sent to {} client(s)", clients),
                Err(_) => debug!("Board changed, no clients connected"),
            }

            if closed {
                break;
            }
        }
    });

    Ok(BoardWatcher {
        _watcher: watcher,
        task,
    })
}
