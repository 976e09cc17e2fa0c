//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

use glasscloud_core::config::AppConfig;

const MULTIPART_BOUNDARY: &str = "glasscloud-test-boundary";

/// Test application context: a full router over a throwaway database and
/// blob directory.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: SqlitePool,
    /// Application config
    pub config: AppConfig,
    _data_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.path = data_dir.path().join("test.db").display().to_string();
        config.storage.blob_root = data_dir.path().join("uploads").display().to_string();
        config.server.public_base_url = "http://cloud.test".to_string();

        let db_pool = glasscloud_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to open test database");

        glasscloud_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let state = glasscloud_api::build_state(config.clone(), db_pool.clone())
            .await
            .expect("Failed to build state");
        let router = glasscloud_api::build_app(state);

        Self {
            router,
            db_pool,
            config,
            _data_dir: data_dir,
        }
    }

    /// Send a JSON request and parse the JSON response.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _headers, bytes) = self.request_raw(method, path, token, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Send a request and return the raw response.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, http::HeaderMap, bytes::Bytes) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&value).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        (status, headers, bytes)
    }

    /// Upload a file through the multipart endpoint.
    pub async fn upload(
        &self,
        token: &str,
        file_name: &str,
        content: &[u8],
        parent_id: Option<i64>,
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();

        if let Some(parent_id) = parent_id {
            body.extend_from_slice(
                format!(
                    "--{MULTIPART_BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"parentId\"\r\n\r\n\
                     {parent_id}\r\n"
                )
                .as_bytes(),
            );
        }

        // No part content type: the server infers one from the file name
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Upload request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Register a user and return the bearer token.
    pub async fn register(&self, username: &str) -> String {
        let (status, json) = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "password": "correct horse battery",
                    "email": format!("{username}@example.com"),
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "register failed: {json}");
        json["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create a folder and return its ID.
    pub async fn create_folder(&self, token: &str, name: &str, parent_id: Option<i64>) -> i64 {
        let (status, json) = self
            .request(
                "POST",
                "/api/folders",
                Some(token),
                Some(json!({ "name": name, "parentId": parent_id })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "create_folder failed: {json}");
        json["data"]["id"].as_i64().unwrap()
    }

    /// Upload a file and return its ID.
    pub async fn upload_file(
        &self,
        token: &str,
        name: &str,
        content: &[u8],
        parent_id: Option<i64>,
    ) -> i64 {
        let (status, json) = self.upload(token, name, content, parent_id).await;
        assert_eq!(status, StatusCode::OK, "upload failed: {json}");
        json["data"]["id"].as_i64().unwrap()
    }

    /// Flip an item's privacy flag.
    pub async fn set_privacy(&self, token: &str, item_id: i64, is_private: bool) {
        let (status, json) = self
            .request(
                "PATCH",
                &format!("/api/items/{item_id}/privacy"),
                Some(token),
                Some(json!({ "isPrivate": is_private })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "set_privacy failed: {json}");
    }

    /// Mint (or fetch) an item's share code.
    pub async fn share(&self, token: &str, item_id: i64) -> String {
        let (status, json) = self
            .request(
                "POST",
                &format!("/api/items/{item_id}/share"),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "share failed: {json}");
        json["data"]["shareCode"].as_str().unwrap().to_string()
    }

    /// Count rows in the items table, for asserting deletes.
    pub async fn count_items(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.db_pool)
            .await
            .expect("count query failed")
    }
}
