use axum::{
    extract::State,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use service::context::CurrentUser;
use service::rating_service::{self, RatingSummary};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::metrics::RATINGS_UPSERTED_TOTAL;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct RatingInput {
    pub rating: i32,
}

#[derive(Serialize)]
pub struct RatingOutput {
    pub your_rating: i32,
    #[serde(flatten)]
    pub summary: RatingSummary,
}

#[utoipa::path(post, path = "/api/recipes/{id}/rating", tag = "ratings",
    params(("id" = i32, Path, description = "Recipe id")),
    request_body = crate::openapi::RatingRequest,
    responses((status = 200, description = "Rating stored"), (status = 400, description = "Out of range"), (status = 403, description = "Own recipe"), (status = 404, description = "Not Found")))]
pub async fn rate_recipe(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<RatingInput>,
) -> Result<Json<RatingOutput>, JsonApiError> {
    rating_service::rate(&state.db, user, id, input.rating).await?;
    RATINGS_UPSERTED_TOTAL.inc();
    let summary = rating_service::average(&state.db, id).await?;
    Ok(Json(RatingOutput { your_rating: input.rating, summary }))
}

/// The caller's own rating, `null` when they have not rated yet.
pub async fn my_rating(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Option<i32>>, JsonApiError> {
    Ok(Json(rating_service::user_rating(&state.db, user, id).await?))
}
