use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;

use crate::content::{self, BlogPost, CommunityPost, BLOG_POSTS, COMMUNITY_POSTS};
use crate::flows::{FlowError, PromptFlow};
use crate::pages::{self, FlowPanel, Site};
use crate::simulation::{self, FieldConfig, SceneSnapshot};
use crate::AppState;

use super::models::{BlogPostDetail, ErrorResponse, HealthResponse, SceneQuery, SearchQuery};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Frames advanced by the scene endpoint when none are requested.
const DEFAULT_SCENE_FRAMES: u32 = 60;

pub async fn run_flow<F: PromptFlow>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<F::Input>, JsonRejection>,
) -> Result<Json<F::Output>, ApiError> {
    // Unreadable or mistyped bodies get the same JSON 400 as failed validation.
    let Json(input) = payload.map_err(|rejection| {
        warn!("{} body rejected: {}", F::NAME, rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(rejection.body_text())),
        )
    })?;
    let mut panel = FlowPanel::<F>::with_form(input);

    match panel.submit(state.backend.as_ref()).await {
        Ok(()) => panel.take_result().map(Json).ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(F::FAILURE_MESSAGE)),
            )
        }),
        Err(FlowError::InvalidInput(fields)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "input failed validation".to_string(),
                fields,
            }),
        )),
        Err(_) => {
            let message = panel
                .notifications()
                .last()
                .map_or(F::FAILURE_MESSAGE, |n| n.description);
            Err((StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(message))))
        }
    }
}

pub async fn list_blog(Query(query): Query<SearchQuery>) -> Json<Vec<&'static BlogPost>> {
    Json(content::search(BLOG_POSTS, query.q.as_deref().unwrap_or_default()))
}

pub async fn blog_post(Path(id): Path<String>) -> Result<Json<BlogPostDetail>, ApiError> {
    let post = id
        .parse::<u32>()
        .ok()
        .and_then(content::blog_post)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("blog post {id} not found"))),
            )
        })?;

    Ok(Json(BlogPostDetail {
        post,
        paragraphs: post.paragraphs(),
    }))
}

pub async fn list_community(
    Query(query): Query<SearchQuery>,
) -> Json<Vec<&'static CommunityPost>> {
    Json(content::search(
        COMMUNITY_POSTS,
        query.q.as_deref().unwrap_or_default(),
    ))
}

pub async fn site() -> Json<Site> {
    Json(pages::site())
}

pub async fn simulation_scene(
    Query(query): Query<SceneQuery>,
) -> Result<Json<SceneSnapshot>, ApiError> {
    let defaults = FieldConfig::default();
    let config = FieldConfig {
        particles: query.particles.unwrap_or(defaults.particles),
        seed: query.seed.unwrap_or(defaults.seed),
        deflect: query.deflect.unwrap_or(defaults.deflect),
        ..defaults
    };
    let frames = query.frames.unwrap_or(DEFAULT_SCENE_FRAMES);

    let rendered =
        tokio::task::spawn_blocking(move || simulation::render_offline(config, frames)).await;

    match rendered {
        Ok(Ok(snapshot)) => Ok(Json(snapshot)),
        Ok(Err(err)) => Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string())))),
        Err(err) => {
            warn!("scene render task failed: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("scene render failed")),
            ))
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model_name.clone(),
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("route not found")),
    )
        .into_response()
}
