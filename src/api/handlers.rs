use crate::{
    api::{AppService, models::*, ws::ws_handler},
    core::{
        calculations::SessionSnapshot,
        export::ExportFormat,
        messages::SessionView,
        models::{AppLog, Session},
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use std::sync::Arc;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{code}", get(get_session))
        .route("/sessions/{code}/snapshot", get(get_snapshot))
        .route("/sessions/{code}/export", get(export_session))
        .route("/sessions/{code}/logs", get(get_session_logs))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

pub fn ws_routes(service: Arc<AppService>) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session created", body = Session),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_session(State(service): State<Arc<AppService>>) -> Result<impl IntoResponse, ApiError> {
    let session = service.create_session().await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{code}",
    params(("code" = String, Path, description = "Session code")),
    responses(
        (status = 200, description = "Session with members, expenses and derived snapshot", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_session(
    State(service): State<Arc<AppService>>,
    Path(code): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = service.get_session_view(&Session::normalize_code(&code)).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{code}/snapshot",
    params(("code" = String, Path, description = "Session code")),
    responses(
        (status = 200, description = "Balances, settlements and summary", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_snapshot(
    State(service): State<Arc<AppService>>,
    Path(code): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = service.snapshot(&Session::normalize_code(&code)).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{code}/export",
    params(("code" = String, Path, description = "Session code"), ExportQuery),
    responses(
        (status = 200, description = "Report file (text/csv or application/json)", body = String),
        (status = 400, description = "Unsupported format", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn export_session(
    State(service): State<Arc<AppService>>,
    Path(code): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = match query.format.as_deref() {
        Some(format) => format.parse::<ExportFormat>()?,
        None => ExportFormat::Csv,
    };
    let report = service.export(&Session::normalize_code(&code), format).await?;

    let disposition = format!("attachment; filename=\"{}\"", format.file_name(Utc::now()));
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report,
    ))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{code}/logs",
    params(("code" = String, Path, description = "Session code")),
    responses(
        (status = 200, description = "Activity log of the session", body = [AppLog]),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_session_logs(
    State(service): State<Arc<AppService>>,
    Path(code): Path<String>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let session = service.get_session(&Session::normalize_code(&code)).await?;
    let logs = service.get_app_logs(Some(&session.code)).await?;
    Ok(Json(logs))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Activity log of every session", body = [AppLog]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(None).await?;
    Ok(Json(logs))
}
