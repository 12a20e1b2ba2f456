//! HTTP route handlers.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::board::BoardSnapshot;
use crate::schedule::ScheduleError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// How long a refresh waits for the ticker to publish the reloaded board.
const REFRESH_PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory. Templates are
/// returned as-is and rendered by their askama_axum `IntoResponse` impl.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/board", get(board))
        .route("/refresh", post(refresh))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The full board page.
async fn index_page(State(state): State<AppState>) -> IndexTemplate {
    IndexTemplate {
        board: BoardView::from_board(&state.current_board()),
    }
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Return the board as an HTML fragment or JSON based on the Accept header.
fn board_response(board: &BoardSnapshot, headers: &HeaderMap) -> Response {
    if accepts_html(headers) {
        BoardTemplate {
            board: BoardView::from_board(board),
        }
        .into_response()
    } else {
        Json(BoardResponse::from_board(board)).into_response()
    }
}

/// The board as last published by the ticker.
async fn board(State(state): State<AppState>, headers: HeaderMap) -> Response {
    board_response(&state.current_board(), &headers)
}

/// Reload the timetable and holiday calendar, then return the new board.
///
/// HTML clients always get the board fragment, which shows a failed load
/// in each station panel. JSON clients get an error status instead.
async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    info!("manual refresh requested");

    let result = state
        .store
        .load_all(&state.schedule, state.clock.as_ref())
        .await;
    let schedule = state.store.snapshot().await;

    let mut rx = state.board.clone();
    let board = match tokio::time::timeout(
        REFRESH_PUBLISH_TIMEOUT,
        rx.wait_for(|board| board.schedule_generation >= schedule.generation),
    )
    .await
    {
        Ok(Ok(board)) => board.clone(),
        _ => {
            warn!("board was not republished after refresh, returning last board");
            state.current_board()
        }
    };

    match result {
        Err(e) if !accepts_html(&headers) => Err(AppError::from(e)),
        _ => Ok(board_response(&board, &headers)),
    }
}

/// Unknown paths.
async fn not_found(headers: HeaderMap) -> Result<Response, AppError> {
    if accepts_html(&headers) {
        let template = ErrorTemplate {
            title: "ページが見つかりません".into(),
            message: "お探しのページは存在しません。".into(),
        };
        Ok((StatusCode::NOT_FOUND, template).into_response())
    } else {
        Err(AppError::NotFound {
            message: "Not found".into(),
        })
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Upstream { message: String },
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message.clone()),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
