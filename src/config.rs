//! Defaults and runtime options shared by the CLI and the render server.

use std::path::PathBuf;
use std::time::Duration;

/// Board file used when no path is given.
pub const DEFAULT_BOARD_PATH: &str = "./board.yaml";

/// Port the render server listens on by default.
pub const DEFAULT_RENDER_PORT: u16 = 3000;

/// Quiet period after the last file event before clients are notified.
pub const RENDER_WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Settings for `statecraft render`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub board_path: PathBuf,
    pub port: u16,
    /// Interface to bind; the UI is meant for the local machine only
    pub host: String,
    pub open_browser: bool,
    /// Directory with a prebuilt UI; the embedded page is used when unset
    pub static_dir: Option<PathBuf>,
    pub debounce: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            board_path: PathBuf::from(DEFAULT_BOARD_PATH),
            port: DEFAULT_RENDER_PORT,
            host: "127.0.0.1".to_string(),
            open_browser: false,
            static_dir: None,
            debounce: RENDER_WATCH_DEBOUNCE,
        }
    }
}

impl RenderOptions {
    pub fn new(board_path: impl Into<PathBuf>) -> Self {
        Self {
            board_path: board_path.into(),
            ..Self::default()
        }
    }
}
