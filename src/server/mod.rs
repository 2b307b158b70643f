//! Read-only render server
//!
//! Serves the board file to a browser UI and pushes changes over a
//! WebSocket as the file is edited.
//!
//! - `GET /api/board`: raw YAML
//! - `GET /api/board/state`: parsed board + validation as JSON
//! - `GET /api/board/watch`: WebSocket stream of file contents
//!
//! # Example
//!
//! ```rust,no_run
//! use statecraft::config::RenderOptions;
//! use statecraft::server::RenderServer;
//!
//! # async fn example() -> Result<(), statecraft::server::ServerError> {
//! let server = RenderServer::bind(&RenderOptions::new("board.yaml")).await?;
//! println!("Open {}", server.url()?);
//! server.run().await
//! # }
//! ```

pub mod routes;
pub mod watcher;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use log::{info, warn};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::RenderOptions;

pub use routes::{build_router, AppState, BoardState};
pub use watcher::{watch_board, BoardWatcher};

/// Errors raised while starting or running the render server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Static UI directory not found: {}", .0.display())]
    MissingStaticDir(PathBuf),

    #[error("Board path has no file name: {}", .0.display())]
    InvalidBoardPath(PathBuf),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A bound, not yet running, render server.
pub struct RenderServer {
    listener: TcpListener,
    router: Router,
    watcher: Option<BoardWatcher>,
}

impl RenderServer {
    /// Binds the listener and starts watching the board file.
    ///
    /// A board file that cannot be watched (e.g. its directory does not
    /// exist yet) is logged and skipped; the server still starts.
    pub async fn bind(options: &RenderOptions) -> Result<Self, ServerError> {
        if let Some(dir) = &options.static_dir {
            if !dir.is_dir() {
                return Err(ServerError::MissingStaticDir(dir.clone()));
            }
        }

        let board_path = std::path::absolute(&options.board_path)?;
        let (updates, _) = broadcast::channel(16);

        let watcher = match watch_board(&board_path, options.debounce, updates.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("Not watching {}: {}", board_path.display(), e);
                None
            }
        };

        let router = build_router(
            AppState::new(board_path, updates),
            options.static_dir.as_deref(),
        );

        let addr = format!("{}:{}", options.host, options.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            router,
            watcher,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Browser URL for the bound port.
    pub fn url(&self) -> Result<String, ServerError> {
        Ok(format!("http://localhost:{}", self.local_addr()?.port()))
    }

    /// Serves requests until the process is stopped.
    pub async fn run(self) -> Result<(), ServerError> {
        let Self {
            listener,
            router,
            watcher,
        } = self;
        let _watcher = watcher;

        info!("Render server listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await?;
        Ok(())
    }
}

/// Opens `url` with the platform's default browser.
pub fn open_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()?;
    }
    Ok(())
}
