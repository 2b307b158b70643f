//! HTTP and WebSocket routes of the render server.

use std::path::{Path, PathBuf};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, info};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tower_http::services::{ServeDir, ServeFile};

use super::watcher::read_board_content;
use crate::board::{
    check_spec_files, parse_board_from_str, validate, Board, ParseError, ValidationResult,
};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    board_path: PathBuf,
    updates: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(board_path: impl Into<PathBuf>, updates: broadcast::Sender<String>) -> Self {
        Self {
            board_path: board_path.into(),
            updates,
        }
    }
}

/// Parsed view of the board served at `/api/board/state`.
#[derive(Serialize, Debug)]
pub struct BoardState {
    pub board: Option<Board>,
    pub validation: Option<ValidationResult>,
    pub error: Option<String>,
}

/// Builds the router: board API, live updates, and the UI.
///
/// With `static_dir` set, unknown paths are served from that directory and
/// fall back to its `index.html`; otherwise the embedded page is served.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/board", get(board_yaml))
        .route("/api/board/state", get(board_state))
        .route("/api/board/watch", get(board_watch))
        .with_state(state);

    match static_dir {
        Some(dir) => api.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => api.route("/", get(index_page)),
    }
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn board_yaml(State(state): State<AppState>) -> Response {
    match read_board_content(&state.board_path).await {
        Some(content) => (
            [(header::CONTENT_TYPE, "text/yaml; charset=utf-8")],
            content,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Board file not found or unreadable.").into_response(),
    }
}

async fn board_state(State(state): State<AppState>) -> Json<BoardState> {
    let parsed = match tokio::fs::read_to_string(&state.board_path).await {
        Ok(content) => parse_board_from_str(&content),
        Err(source) => Err(ParseError::Read {
            path: state.board_path.clone(),
            source,
        }),
    };

    let body = match parsed {
        Ok(board) => {
            let base_dir = state.board_path.parent().unwrap_or(Path::new("."));
            let validation = validate(&board).with_warnings(check_spec_files(&board, base_dir));
            BoardState {
                board: Some(board),
                validation: Some(validation),
                error: None,
            }
        }
        Err(e) => BoardState {
            board: None,
            validation: None,
            error: Some(e.to_string()),
        },
    };
    Json(body)
}

async fn board_watch(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, state))
}

/// Sends the current board on connect, then every broadcast update until the
/// client goes away.
async fn client_session(mut socket: WebSocket, state: AppState) {
    let mut updates = state.updates.subscribe();
    info!("Watch client connected");

    if let Some(content) = read_board_content(&state.board_path).await {
        if socket.send(Message::Text(content)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(content) => {
                    if socket.send(Message::Text(content)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Watch client skipped {} stale update(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Watch client disconnected");
}
