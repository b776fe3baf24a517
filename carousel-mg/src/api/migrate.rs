//! Migration and analysis endpoints
//!
//! Both endpoints return the human-readable report as the response body,
//! rendered with `<br>` line endings for browser consumption. There is no
//! machine-readable report format.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::migrate::report::{OutputMode, Reporter};
use crate::migrate::{run_analysis, run_migration};
use crate::AppState;

/// POST /api/migrate
///
/// Runs the full migration once. A storage failure aborts the run; rows
/// already written stay in place and a re-run converges (idempotent).
pub async fn migrate_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut report = Reporter::new(OutputMode::Http);

    match run_migration(&state.db, &mut report).await {
        Ok(_) => Ok(Html(report.render())),
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(ApiError::Database(e.to_string()))
        }
    }
}

/// GET /api/analyze
///
/// Reports on remaining legacy structures. Strictly read-only.
pub async fn analyze_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut report = Reporter::new(OutputMode::Http);

    match run_analysis(&state.db, &mut report).await {
        Ok(_) => Ok(Html(report.render())),
        Err(e) => {
            error!("Analysis failed: {}", e);
            Err(ApiError::Database(e.to_string()))
        }
    }
}

/// Migration API errors
#[derive(Debug)]
pub enum ApiError {
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
