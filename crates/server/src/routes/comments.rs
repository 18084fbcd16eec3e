use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use service::comment_service;
use service::context::CurrentUser;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::metrics::COMMENTS_ADDED_TOTAL;
use crate::routes::auth::ServerState;
use crate::routes::recipes::CreatedOutput;

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub content: String,
}

#[utoipa::path(post, path = "/api/recipes/{id}/comments", tag = "comments",
    params(("id" = i32, Path, description = "Recipe id")),
    request_body = crate::openapi::CommentRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation failed"), (status = 404, description = "Not Found")))]
pub async fn add_comment(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(recipe_id): ApiPath<i32>,
    ApiJson(input): ApiJson<CommentInput>,
) -> Result<(StatusCode, Json<CreatedOutput>), JsonApiError> {
    let id = comment_service::add_comment(&state.db, user, state.limits.comment, recipe_id, &input.content).await?;
    COMMENTS_ADDED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(CreatedOutput { id })))
}

pub async fn delete_comment(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath((recipe_id, comment_id)): ApiPath<(i32, i32)>,
) -> Result<StatusCode, JsonApiError> {
    comment_service::delete_comment(&state.db, user, recipe_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
