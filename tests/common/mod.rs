#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{json, Value};

use gala_api::routes;
use gala_api::services::AppState;

pub struct TestServer {
    pub base_url: String,
}

/// Spawn an in-process server with fresh state on an ephemeral port.
pub async fn spawn_server() -> Result<TestServer> {
    // Must land before the config singleton is first touched
    std::env::set_var("SECURITY_JWT_SECRET", "integration-test-secret");
    std::env::set_var("AUTH_BOOTSTRAP_ADMINS", "root-admin");

    let app = routes::app(AppState::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
    })
}

pub async fn register(
    client: &reqwest::Client,
    server: &TestServer,
    username: &str,
    password: &str,
) -> Result<reqwest::Response> {
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await?;
    Ok(res)
}

pub async fn login_token(
    client: &reqwest::Client,
    server: &TestServer,
    username: &str,
    password: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .context("login response missing access_token")
}

/// Register + login a user, returning its token.
pub async fn user_token(
    client: &reqwest::Client,
    server: &TestServer,
    username: &str,
) -> Result<String> {
    register(client, server, username, "pw").await?;
    login_token(client, server, username, "pw").await
}

/// The bootstrap admin account ("root-admin" gets ADMIN at registration).
pub async fn admin_token(client: &reqwest::Client, server: &TestServer) -> Result<String> {
    user_token(client, server, "root-admin").await
}

/// Create an event as admin and return its id.
pub async fn create_event(
    client: &reqwest::Client,
    server: &TestServer,
    admin_token: &str,
    title: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/events", server.base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "title": title,
            "description": "integration test event",
            "start_date": "2026-08-01T00:00:00Z",
            "end_date": "2026-09-01T00:00:00Z",
        }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    body["event"]["id"]
        .as_str()
        .map(str::to_string)
        .context("event response missing id")
}

/// Create a reward as admin and return its id.
pub async fn create_reward(
    client: &reqwest::Client,
    server: &TestServer,
    admin_token: &str,
    event_id: &str,
    required_attendance: u32,
) -> Result<String> {
    let res = client
        .post(format!("{}/rewards", server.base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "event_id": event_id,
            "title": "attendance reward",
            "description": "granted for showing up",
            "required_attendance": required_attendance,
            "reward_type": "POINT",
            "reward_value": "1000",
        }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    body["reward"]["id"]
        .as_str()
        .map(str::to_string)
        .context("reward response missing id")
}

/// Record one attendance unit for a user on an event.
pub async fn record_attendance(
    client: &reqwest::Client,
    server: &TestServer,
    admin_token: &str,
    event_id: &str,
    user_id: &str,
) -> Result<reqwest::Response> {
    let res = client
        .post(format!("{}/events/{}/attendance", server.base_url, event_id))
        .bearer_auth(admin_token)
        .json(&json!({ "user_id": user_id }))
        .send()
        .await?;
    Ok(res)
}

/// The caller's own user id, via whoami.
pub async fn own_user_id(
    client: &reqwest::Client,
    server: &TestServer,
    token: &str,
) -> Result<String> {
    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    body["user"]["id"]
        .as_str()
        .map(str::to_string)
        .context("whoami response missing user id")
}
