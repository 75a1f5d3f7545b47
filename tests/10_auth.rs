mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_is_public() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], json!(true));
    Ok(())
}

#[tokio::test]
async fn register_login_whoami_roundtrip() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = common::register(&client, &server, "alice", "hunter2").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["username"], json!("alice"));
    assert_eq!(body["user"]["roles"], json!(["USER"]));

    let token = common::login_token(&client, &server, "alice", "hunter2").await?;

    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["username"], json!("alice"));
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    common::register(&client, &server, "alice", "pw").await?;
    let res = common::register(&client, &server, "alice", "pw").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("CONFLICT"));
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    common::register(&client, &server, "alice", "pw").await?;
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn bootstrap_admin_receives_admin_role() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = common::register(&client, &server, "root-admin", "pw").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["roles"], json!(["USER", "ADMIN"]));
    Ok(())
}

#[tokio::test]
async fn role_assignment_is_admin_only() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let admin = common::admin_token(&client, &server).await?;
    let user = common::user_token(&client, &server, "carol").await?;

    // A plain user may not assign roles
    let res = client
        .put(format!("{}/auth/users/carol/roles", server.base_url))
        .bearer_auth(&user)
        .json(&json!({ "roles": ["AUDITOR"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The admin may
    let res = client
        .put(format!("{}/auth/users/carol/roles", server.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "roles": ["USER", "AUDITOR"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["roles"], json!(["USER", "AUDITOR"]));

    // Unknown accounts are a 404
    let res = client
        .put(format!("{}/auth/users/nobody/roles", server.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "roles": ["USER"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
