use crate::app::dto::*;
use crate::app::engine::AnalysisEngine;
use crate::domain::error::AnalysisError;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct HttpState {
    pub engine: AnalysisEngine,
}

#[derive(Debug, Clone, serde::Serialize)]
struct ApiErrorBody {
    error: String,
}

fn error_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::NotFound { .. } | AnalysisError::EmptyCatalog { .. } => {
            StatusCode::NOT_FOUND
        }
        AnalysisError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        AnalysisError::CatalogAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: AnalysisError) -> (StatusCode, Json<ApiErrorBody>) {
    (
        error_status(&err),
        Json(ApiErrorBody {
            error: err.to_string(),
        }),
    )
}

fn join_error(e: tokio::task::JoinError) -> (StatusCode, Json<ApiErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorBody {
            error: format!("task join error: {e}"),
        }),
    )
}

pub fn build_router(engine: AnalysisEngine) -> Router {
    let state = Arc::new(HttpState { engine });

    Router::new()
        .route("/health", get(health))
        .route("/analyze/dependencies", post(dependencies))
        .route("/analyze/hierarchies", post(hierarchies))
        .route("/analyze/generics", post(generics))
        .route("/analyze/compatibility", post(compatibility))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(engine: AnalysisEngine, addr: SocketAddr) -> Result<()> {
    let app = build_router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.health()).await {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(err)) => api_error(err).into_response(),
        Err(e) => join_error(e).into_response(),
    }
}

async fn dependencies(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<DependencyAnalysisRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.analyze_dependencies(req)).await {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(err)) => api_error(err).into_response(),
        Err(e) => join_error(e).into_response(),
    }
}

async fn hierarchies(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<HierarchyAnalysisRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.analyze_hierarchies(req)).await {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(err)) => api_error(err).into_response(),
        Err(e) => join_error(e).into_response(),
    }
}

async fn generics(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<GenericAnalysisRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.analyze_generic_types(req)).await {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(err)) => api_error(err).into_response(),
        Err(e) => join_error(e).into_response(),
    }
}

async fn compatibility(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CompatibilityAnalysisRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.analyze_compatibility(req)).await {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(err)) => api_error(err).into_response(),
        Err(e) => join_error(e).into_response(),
    }
}
