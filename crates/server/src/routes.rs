use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::{metrics, openapi};

pub mod auth;
pub mod comments;
pub mod home;
pub mod ratings;
pub mod recipes;

use auth::ServerState;

/// Covers a 5 MiB image plus the multipart envelope and text fields.
pub const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, session-protected mutations.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/api/categories", get(recipes::list_categories))
        .route("/api/recipes", get(recipes::list_recipes))
        .route("/api/recipes/top", get(recipes::top_recipes))
        .route("/api/recipes/:id", get(recipes::get_recipe))
        .route("/api/recipes/:id/image", get(recipes::recipe_image));

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/api/recipes", post(recipes::create_recipe))
        .route("/api/recipes/:id", axum::routing::put(recipes::update_recipe).delete(recipes::delete_recipe))
        .route("/api/recipes/:id/image", axum::routing::put(recipes::replace_image))
        .route("/api/recipes/:id/rating", post(ratings::rate_recipe).get(ratings::my_rating))
        .route("/api/recipes/:id/comments", post(comments::add_comment))
        .route("/api/recipes/:id/comments/:comment_id", delete(comments::delete_comment))
        .route("/api/account/recipes", get(recipes::account_recipes))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    public
        .merge(protected)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
