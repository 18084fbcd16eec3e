use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use configs::Limits;
use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::AuthService;
use service::context::CurrentUser;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::metrics::FAILED_LOGINS_TOTAL;

pub const AUTH_COOKIE: &str = "auth_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub session_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub limits: Arc<Limits>,
    pub auth_svc: Arc<AuthService<SeaOrmAuthRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: ServerAuthConfig, limits: Limits) -> Self {
        let limits = Arc::new(limits);
        let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
        let auth_svc = Arc::new(AuthService::new(repo, Arc::clone(&limits)));
        Self { db, auth, limits, auth_svc }
    }
}

/// Session token claims. `csrf` must be echoed in [`CSRF_HEADER`] on mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i32,
    pub username: String,
    pub csrf: String,
    pub exp: usize,
}

pub fn mint_token(cfg: &ServerAuthConfig, user: &AuthUser) -> Result<(String, Claims), JsonApiError> {
    let exp = (Utc::now() + Duration::hours(cfg.session_hours)).timestamp().max(0) as usize;
    let claims = Claims { uid: user.id, username: user.username.clone(), csrf: Uuid::new_v4().simple().to_string(), exp };
    let token = encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()))
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Token Error", Some(e.to_string())))?;
    Ok((token, claims))
}

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: i32,
    pub username: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: i32,
    pub username: String,
    pub csrf_token: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: i32,
    pub username: String,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), JsonApiError> {
    let user = state.auth_svc.register(input).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { user_id: user.id, username: user.username })))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let Some(user) = state.auth_svc.authenticate(input).await? else {
        FAILED_LOGINS_TOTAL.inc();
        return Err(JsonApiError::unauthorized("Invalid username or password"));
    };
    let (token, claims) = mint_token(&state.auth, &user)?;
    info!(user_id = user.id, "session_started");
    let jar = jar.add(session_cookie(token));
    Ok((jar, Json(LoginOutput { user_id: user.id, username: user.username, csrf_token: claims.csrf })))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

pub async fn me(Extension(claims): Extension<Claims>) -> Json<MeOutput> {
    Json(MeOutput { user_id: claims.uid, username: claims.username })
}

fn bearer_or_cookie(req: &Request) -> Option<String> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h.strip_prefix("Bearer ").map(str::to_string);
    }
    CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Decode the session token and expose it as [`CurrentUser`] and [`Claims`]
/// request extensions. Mutating requests must also carry the CSRF header.
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = bearer_or_cookie(&req) else {
        return Err(JsonApiError::unauthorized("Please log in"));
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let claims = match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            return Err(JsonApiError::unauthorized("Session expired or invalid"));
        }
    };

    if !is_safe(req.method()) {
        let sent = req.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok());
        if sent != Some(claims.csrf.as_str()) {
            warn!(path = %path, user_id = claims.uid, "csrf token mismatch");
            return Err(JsonApiError::forbidden("Missing or invalid CSRF token"));
        }
    }

    req.extensions_mut().insert(CurrentUser::new(claims.uid));
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
