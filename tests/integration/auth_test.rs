//! Registration, login, token lifecycle.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_and_me() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let (status, json) = app.request("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    app.register("bob").await;

    let (status, json) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "bob",
                "password": "another password",
                "email": "bob2@example.com",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "carol",
                "password": "short",
                "email": "carol@example.com",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_valid_and_invalid_credentials() {
    let app = TestApp::new().await;
    app.register("dave").await;

    let (status, json) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "dave", "password": "correct horse battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["token"].as_str().unwrap().len() >= 32);

    let (status, json) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "dave", "password": "wrong password!" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "UNAUTHORIZED");

    // Unknown user looks identical to a bad password
    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "whatever else" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.register("erin").await;

    let (status, _) = app
        .request("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logging out an already-dead token still succeeds
    let (status, _) = app
        .request("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_pruned() {
    let app = TestApp::new().await;
    let token = app.register("frank").await;

    let expired_at = chrono::Utc::now() - chrono::Duration::days(1);
    sqlx::query("UPDATE tokens SET expires_at = ? WHERE token = ?")
        .bind(expired_at)
        .bind(&token)
        .execute(&app.db_pool)
        .await
        .expect("failed to age token");

    let (status, _) = app.request("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Expired tokens are deleted on first sight
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tokens WHERE token = ?")
        .bind(&token)
        .fetch_one(&app.db_pool)
        .await
        .expect("count query failed");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/api/items", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/api/items", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, json) = app.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
}
