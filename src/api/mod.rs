mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::flows::{GenerateStartingStrategy, PredictRaceOutcome, SummarizeRaceTelemetry};
use crate::AppState;

pub use models::{BlogPostDetail, ErrorResponse, HealthResponse, SceneQuery, SearchQuery};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/flows/predict-race-outcome",
            post(handlers::run_flow::<PredictRaceOutcome>),
        )
        .route(
            "/api/flows/summarize-race-telemetry",
            post(handlers::run_flow::<SummarizeRaceTelemetry>),
        )
        .route(
            "/api/flows/generate-starting-strategy",
            post(handlers::run_flow::<GenerateStartingStrategy>),
        )
        .route("/api/blog", get(handlers::list_blog))
        .route("/api/blog/:id", get(handlers::blog_post))
        .route("/api/community", get(handlers::list_community))
        .route("/api/pages", get(handlers::site))
        .route("/api/simulation/scene", get(handlers::simulation_scene))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
}
