//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use bytes::Bytes;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use adrive_api::AppState;
use adrive_api::auth::Claims;
use adrive_core::config::{AppConfig, AuthConfig, DatabaseConfig, StorageConfig};
use adrive_database::DatabasePool;
use adrive_database::migration::run_migrations;
use adrive_entity::user::UserRole;

const JWT_SECRET: &str = "integration-test-secret";
const BOUNDARY: &str = "adrive-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Holds the storage root alive for the test's duration
    dir: TempDir,
}

impl TestApp {
    /// Create a new test application backed by an in-memory database and a temp storage root
    pub async fn new() -> Self {
        Self::with_storage(|_| {}).await
    }

    /// Create a test application with adjusted storage settings
    pub async fn with_storage(adjust: impl FnOnce(&mut StorageConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut storage = StorageConfig::with_root(dir.path().join("files").display().to_string());
        storage.temp_directory = Some(dir.path().join("tmp").display().to_string());
        adjust(&mut storage);

        let config = AppConfig {
            server: Default::default(),
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                connect_timeout_seconds: 5,
            },
            storage,
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                jwt_leeway_seconds: 0,
            },
            logging: Default::default(),
        };

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        std::fs::create_dir_all(dir.path().join("tmp")).expect("Failed to create temp dir");

        let state = AppState::build(config.clone(), db)
            .await
            .expect("Failed to build state");
        let router = adrive_api::build_router(state);

        Self {
            router,
            config,
            dir,
        }
    }

    /// Mint an access token for a user
    pub fn token(&self, user_id: i64) -> String {
        self.token_with_expiry(user_id, 3600)
    }

    /// Mint a token expiring `seconds` from now (negative for an expired token)
    pub fn token_with_expiry(&self, user_id: i64, seconds: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role: UserRole::User,
            username: format!("user{user_id}"),
            iat: now,
            exp: now + seconds,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .expect("Failed to encode token")
    }

    /// Path under the storage root
    pub fn physical(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join("files").join(relative)
    }

    /// Make a JSON HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a multipart request with one `file` part and optional text fields
    pub async fn multipart(
        &self,
        path: &str,
        token: &str,
        file_name: &str,
        content: &[u8],
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Create a folder and return its ID
    pub async fn create_folder(&self, token: &str, name: &str, parent_id: Option<i64>) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent_id": parent_id })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create folder failed: {:?}",
            response.body
        );
        response.data()["id"].as_i64().expect("folder id")
    }

    /// Upload a file and return its ID
    pub async fn upload(
        &self,
        token: &str,
        folder_id: Option<i64>,
        name: &str,
        content: &[u8],
    ) -> i64 {
        let folder = folder_id.map(|id| id.to_string());
        let fields: Vec<(&str, &str)> = folder
            .as_deref()
            .map(|id| vec![("folder_id", id)])
            .unwrap_or_default();

        let response = self
            .multipart("/api/files/upload", token, name, content, &fields)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.body
        );
        response.data()["id"].as_i64().expect("file id")
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body (`Null` for non-JSON bodies)
    pub body: Value,
    /// Raw body
    pub bytes: Bytes,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// Sorted entry names of a zip body
    pub fn zip_names(&self) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(self.bytes.to_vec()))
            .expect("Failed to open zip");
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("zip entry").name().to_string())
            .collect();
        names.sort();
        names
    }
}
