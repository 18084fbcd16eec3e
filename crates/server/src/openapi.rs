use axum::Json;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

/// Multipart form for creating a recipe; `cover` is optional.
#[derive(ToSchema)]
pub struct RecipeForm {
    pub name: String,
    pub ingredients: String,
    pub directions: String,
    pub category_id: i32,
    #[schema(format = Binary)]
    pub cover: Option<String>,
}

#[derive(ToSchema)]
pub struct RatingRequest {
    /// 1 to 5
    pub rating: i32,
}

#[derive(ToSchema)]
pub struct CommentRequest { pub content: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::recipes::list_recipes,
        crate::routes::recipes::create_recipe,
        crate::routes::recipes::get_recipe,
        crate::routes::ratings::rate_recipe,
        crate::routes::comments::add_comment,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RecipeForm,
            RatingRequest,
            CommentRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "recipes"),
        (name = "ratings"),
        (name = "comments")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
