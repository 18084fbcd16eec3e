#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, DatabaseConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";
const BOUNDARY: &str = "recipehubtestboundary";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig::in_memory();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg
}

pub async fn build_app() -> anyhow::Result<Router> {
    server::build_app(&test_config()).await
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<Reply> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX).await?.to_vec();
    Ok(Reply { status, headers, body })
}

/// Cookie and anti-forgery token of a logged-in user.
#[derive(Clone)]
pub struct Session {
    pub user_id: i64,
    pub cookie: String,
    pub csrf: String,
}

pub fn request(method: Method, uri: &str, session: Option<&Session>) -> axum::http::request::Builder {
    let mut b = Request::builder().method(method.clone()).uri(uri);
    if let Some(s) = session {
        b = b.header(header::COOKIE, &s.cookie);
        if method != Method::GET {
            b = b.header("x-csrf-token", &s.csrf);
        }
    }
    b
}

pub fn json_request(method: Method, uri: &str, session: Option<&Session>, body: Value) -> Request<Body> {
    request(method, uri, session)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str, session: Option<&Session>) -> Request<Body> {
    request(method, uri, session).body(Body::empty()).unwrap()
}

pub async fn register(app: &Router, username: &str, password: &str) -> anyhow::Result<Reply> {
    let req = json_request(Method::POST, "/auth/register", None, json!({"username": username, "password": password}));
    send(app, req).await
}

pub async fn login(app: &Router, username: &str, password: &str) -> anyhow::Result<Reply> {
    let req = json_request(Method::POST, "/auth/login", None, json!({"username": username, "password": password}));
    send(app, req).await
}

pub async fn signed_up(app: &Router, username: &str) -> anyhow::Result<Session> {
    let reg = register(app, username, "Passw0rd!").await?;
    assert_eq!(reg.status, StatusCode::CREATED, "register {username}");
    let resp = login(app, username, "Passw0rd!").await?;
    assert_eq!(resp.status, StatusCode::OK, "login {username}");
    let cookie = resp
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("login did not set a cookie"))?;
    let body = resp.json();
    Ok(Session {
        user_id: body["user_id"].as_i64().unwrap_or_default(),
        cookie,
        csrf: body["csrf_token"].as_str().unwrap_or_default().to_string(),
    })
}

/// One `multipart/form-data` part.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_request(method: Method, uri: &str, session: Option<&Session>, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, content_type, bytes) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n")
                        .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    request(method, uri, session)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn create_recipe(app: &Router, session: &Session, name: &str, category: &str, cover: Option<&[u8]>) -> anyhow::Result<Reply> {
    let mut parts = vec![
        Part::Text("name", name),
        Part::Text("ingredients", "flour, eggs, milk"),
        Part::Text("directions", "Mix everything and bake."),
        Part::Text("category_id", category),
    ];
    if let Some(bytes) = cover {
        parts.push(Part::File("cover", "image/png", bytes));
    }
    send(app, multipart_request(Method::POST, "/api/recipes", Some(session), &parts)).await
}
