mod support;

use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let app = support::build_app().await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().cookie_store(true).build().expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_session_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = client();
    let creds = json!({"username": "e2e_chef", "password": "Passw0rd!"});

    let res = http.post(format!("{}/auth/register", app.base_url)).json(&creds).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = http.post(format!("{}/auth/login", app.base_url)).json(&creds).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let login: Value = res.json().await?;
    let csrf = login["csrf_token"].as_str().unwrap_or_default().to_string();

    let me: Value = http.get(format!("{}/auth/me", app.base_url)).send().await?.json().await?;
    assert_eq!(me["username"], "e2e_chef");

    let res = http
        .post(format!("{}/api/recipes/1/comments", app.base_url))
        .json(&json!({"content": "no recipe yet"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    let res = http
        .post(format!("{}/api/recipes/1/comments", app.base_url))
        .header("x-csrf-token", &csrf)
        .json(&json!({"content": "no recipe yet"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = http.post(format!("{}/auth/logout", app.base_url)).header("x-csrf-token", &csrf).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = http.get(format!("{}/auth/me", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}
