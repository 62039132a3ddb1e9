//! HTTP control and stream surface.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    encode::multipart,
    foundation::error::{PosecastError, PosecastResult},
    pose::state::ParamValue,
    session::{app::App, state::LoopState},
};

/// Build the router for `app`. Every route lives under `/api/avatar/`.
///
/// Image uploads may be as large as [`App::upload_limit`]; other bodies keep axum's default cap.
pub fn build_router(app: Arc<App>) -> Router {
    let upload_limit = DefaultBodyLimit::max(app.upload_limit());
    Router::new()
        .route("/api/avatar/result_feed", get(result_feed))
        .route("/api/avatar/load", post(load).layer(upload_limit))
        .route("/api/avatar/load_path", post(load_path))
        .route("/api/avatar/pause", post(pause))
        .route("/api/avatar/resume", post(resume))
        .route("/api/avatar/start_talking", post(start_talking))
        .route("/api/avatar/stop_talking", post(stop_talking))
        .route("/api/avatar/emotion", post(emotion))
        .route("/api/avatar/param", post(param))
        .route("/api/avatar/status", get(status))
        .route("/api/avatar/pose", get(pose))
        .layer(CorsLayer::permissive())
        .with_state(app)
}

fn status_code(err: &PosecastError) -> StatusCode {
    match err {
        PosecastError::MissingAlphaChannel => StatusCode::UNPROCESSABLE_ENTITY,
        PosecastError::ImageDecode(_)
        | PosecastError::UnknownParameter(_)
        | PosecastError::Validation(_) => StatusCode::BAD_REQUEST,
        PosecastError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PosecastError::Inference(_) | PosecastError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &PosecastError) -> Response {
    (
        status_code(err),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

fn command_result(result: PosecastResult<()>, app: &App) -> Response {
    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "ok": true, "state": app.state() })),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

async fn result_feed(State(app): State<Arc<App>>) -> impl IntoResponse {
    let stream = app.broadcaster().attach();
    (
        [
            (header::CONTENT_TYPE, multipart::CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
}

/// Run a command that may wait on the render gate on the blocking pool.
async fn blocking<T, F>(app: &Arc<App>, command: F) -> PosecastResult<T>
where
    F: FnOnce(&App) -> T + Send + 'static,
    T: Send + 'static,
{
    let worker = Arc::clone(app);
    tokio::task::spawn_blocking(move || command(&worker))
        .await
        .map_err(|join| PosecastError::Other(anyhow::anyhow!("command task failed: {join}")))
}

async fn run_load<F>(app: Arc<App>, load: F) -> Response
where
    F: FnOnce(&App) -> PosecastResult<()> + Send + 'static,
{
    let result = blocking(&app, load).await.and_then(|loaded| loaded);
    command_result(result, &app)
}

fn state_response(result: PosecastResult<LoopState>) -> Response {
    match result {
        Ok(state) => Json(serde_json::json!({ "state": state })).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn load(State(app): State<Arc<App>>, body: Bytes) -> Response {
    run_load(app, move |app| app.load_bytes(&body)).await
}

#[derive(serde::Deserialize)]
struct LoadPathRequest {
    path: PathBuf,
}

async fn load_path(State(app): State<Arc<App>>, Json(body): Json<LoadPathRequest>) -> Response {
    run_load(app, move |app| app.load_path(&body.path)).await
}

async fn pause(State(app): State<Arc<App>>) -> Response {
    state_response(blocking(&app, App::pause).await)
}

async fn resume(State(app): State<Arc<App>>) -> Response {
    state_response(blocking(&app, App::resume).await)
}

async fn start_talking(State(app): State<Arc<App>>) -> impl IntoResponse {
    app.start_talking();
    Json(serde_json::json!({ "talking": true }))
}

async fn stop_talking(State(app): State<Arc<App>>) -> impl IntoResponse {
    app.stop_talking();
    Json(serde_json::json!({ "talking": false }))
}

#[derive(serde::Deserialize)]
struct EmotionRequest {
    name: String,
}

async fn emotion(
    State(app): State<Arc<App>>,
    Json(body): Json<EmotionRequest>,
) -> impl IntoResponse {
    let applied = app.apply_emotion(&body.name).map(|e| e.name());
    Json(serde_json::json!({ "applied": applied }))
}

#[derive(serde::Deserialize)]
struct ParamRequest {
    name: String,
    value: ParamValue,
}

async fn param(State(app): State<Arc<App>>, Json(body): Json<ParamRequest>) -> Response {
    match app.set_param(&body.name, body.value) {
        Ok(()) => Json(serde_json::json!({ "name": body.name, "value": body.value }))
            .into_response(),
        Err(err) => error_response(&err),
    }
}

async fn status(State(app): State<Arc<App>>) -> impl IntoResponse {
    Json(app.status())
}

async fn pose(State(app): State<Arc<App>>) -> impl IntoResponse {
    Json(app.pose())
}

#[cfg(test)]
#[path = "../../tests/unit/server/mod.rs"]
mod tests;
