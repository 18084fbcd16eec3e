use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use common::time::format_relative;
use models::recipe::RecipeFields;
use service::comment_service;
use service::context::CurrentUser;
use service::images::ImageUpload;
use service::listing_service::{self, RecipeQuery, RecipeSummary, TopRecipe, TOP_RECIPES_DEFAULT};
use service::pagination::{Page, Pagination};
use service::recipe_service::{self, RecipeDetail};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::metrics::RECIPES_CREATED_TOTAL;
use crate::routes::auth::ServerState;

const MAX_TOP_LIMIT: u64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub limit: Option<String>,
}

/// JSON body for `PUT /api/recipes/:id`.
#[derive(Debug, Deserialize)]
pub struct RecipeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub directions: String,
    pub category_id: i32,
}

impl From<RecipeInput> for RecipeFields {
    fn from(i: RecipeInput) -> Self {
        RecipeFields { name: i.name, ingredients: i.ingredients, directions: i.directions, category_id: i.category_id }
    }
}

#[derive(Serialize)]
pub struct CreatedOutput {
    pub id: i32,
}

#[derive(Serialize)]
pub struct CommentOutput {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub username: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub posted: String,
}

#[derive(Serialize)]
pub struct RecipePage {
    pub recipe: RecipeDetail,
    pub comments: Vec<CommentOutput>,
}

#[utoipa::path(get, path = "/api/recipes", tag = "recipes",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of name, ingredients or directions"),
        ("category" = Option<String>, Query, description = "Category id; ignored when not numeric"),
        ("page" = Option<String>, Query, description = "1-based page, clamped into range"),
    ),
    responses((status = 200, description = "One page of recipes, newest first")))]
pub async fn list_recipes(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<RecipeSummary>>, JsonApiError> {
    let query = RecipeQuery::from_params(params.search.as_deref(), params.category.as_deref());
    let page = params.page.as_deref().and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1);
    let pagination = Pagination::new(page, state.limits.page_size);
    Ok(Json(listing_service::list_recipes(&state.db, &query, pagination).await?))
}

pub async fn top_recipes(
    State(state): State<ServerState>,
    Query(params): Query<TopParams>,
) -> Result<Json<Vec<TopRecipe>>, JsonApiError> {
    let limit = params
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<u64>().ok())
        .unwrap_or(TOP_RECIPES_DEFAULT)
        .clamp(1, MAX_TOP_LIMIT);
    Ok(Json(listing_service::top_recipes(&state.db, limit).await?))
}

pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<models::category::Model>>, JsonApiError> {
    Ok(Json(listing_service::categories(&state.db).await?))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> JsonApiError {
    JsonApiError::new(e.status(), "Bad Request", Some(e.body_text()))
}

/// Non-empty `cover` part, if any.
async fn read_cover(field: axum::extract::multipart::Field<'_>) -> Result<Option<ImageUpload>, JsonApiError> {
    let declared_type = field.content_type().map(str::to_string);
    let bytes: Bytes = field.bytes().await.map_err(multipart_error)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageUpload { bytes: bytes.to_vec(), declared_type }))
}

fn parse_category(raw: Option<String>) -> Result<i32, JsonApiError> {
    raw.as_deref()
        .and_then(|c| c.trim().parse::<i32>().ok())
        .ok_or_else(|| service::errors::ServiceError::InvalidInput("category_id must be a number".into()).into())
}

#[utoipa::path(post, path = "/api/recipes", tag = "recipes",
    request_body(content = crate::openapi::RecipeForm, content_type = "multipart/form-data"),
    responses((status = 201, description = "Created"), (status = 400, description = "Validation failed"), (status = 413, description = "Image too large")))]
pub async fn create_recipe(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedOutput>), JsonApiError> {
    let (mut name, mut ingredients, mut directions) = (String::new(), String::new(), String::new());
    let mut category = None;
    let mut cover = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "cover" => cover = read_cover(field).await?,
            "name" => name = field.text().await.map_err(multipart_error)?,
            "ingredients" => ingredients = field.text().await.map_err(multipart_error)?,
            "directions" => directions = field.text().await.map_err(multipart_error)?,
            "category_id" => category = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }
    let fields = RecipeFields { name, ingredients, directions, category_id: parse_category(category)? };
    let id = recipe_service::create_recipe(&state.db, user, &state.limits, fields, cover).await?;
    RECIPES_CREATED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(CreatedOutput { id })))
}

#[utoipa::path(get, path = "/api/recipes/{id}", tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses((status = 200, description = "Recipe with comments"), (status = 404, description = "Not Found")))]
pub async fn get_recipe(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<RecipePage>, JsonApiError> {
    let recipe = recipe_service::get_recipe(&state.db, id).await?;
    let now = chrono::Utc::now();
    let comments = comment_service::list_comments(&state.db, id)
        .await?
        .into_iter()
        .map(|c| CommentOutput {
            posted: format_relative(c.created_at, now),
            id: c.id,
            content: c.content,
            user_id: c.user_id,
            username: c.username,
            created_at: c.created_at,
        })
        .collect();
    Ok(Json(RecipePage { recipe, comments }))
}

pub async fn update_recipe(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<RecipeInput>,
) -> Result<StatusCode, JsonApiError> {
    recipe_service::update_recipe(&state.db, user, &state.limits, id, input.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_recipe(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, JsonApiError> {
    recipe_service::delete_recipe(&state.db, user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recipe_image(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<impl IntoResponse, JsonApiError> {
    let image = recipe_service::recipe_image(&state.db, id).await?;
    Ok(([(header::CONTENT_TYPE, image.mime_type)], image.bytes))
}

pub async fn replace_image(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    mut multipart: Multipart,
) -> Result<StatusCode, JsonApiError> {
    let mut cover = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("cover") {
            cover = read_cover(field).await?;
        }
    }
    let Some(cover) = cover else {
        return Err(JsonApiError::bad_request("cover image is required"));
    };
    recipe_service::replace_image(&state.db, user, id, cover).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn account_recipes(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<models::recipe::Model>>, JsonApiError> {
    Ok(Json(recipe_service::recipes_by_owner(&state.db, user).await?))
}
