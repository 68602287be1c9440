#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use facility_portal::{
    app,
    config::AppConfig,
    database::{DatabaseManager, SUPERUSER},
    services::{NewUser, UserService},
    workflow::Role,
    AppState,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SUPERUSER_PASSWORD: &str = "123";
pub const PASSWORD: &str = "secret";
pub const MULTIPART_BOUNDARY: &str = "facility-test-boundary";

/// Router over a private in-memory database
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

/// Status, headers and raw body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let pool = DatabaseManager::connect_in_memory(SUPERUSER_PASSWORD).await?;
        let state = AppState::new(pool.clone(), AppConfig::development());
        Ok(Self { router: app(state), pool })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?.to_vec();
        Ok(TestResponse { status, content_type, bytes })
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// POST a multipart quote: vendor, cost and an invoice file
    pub async fn post_quote(&self, id: &str, token: &str, vendor: &str, cost: &str, invoice: &[u8]) -> Result<TestResponse> {
        let mut body = Vec::new();
        for (name, value) in [("vendor", vendor), ("cost", cost)] {
            body.extend_from_slice(
                format!(
                    "--{b}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                    b = MULTIPART_BOUNDARY
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"invoice\"; filename=\"invoice.png\"\r\nContent-Type: image/png\r\n\r\n",
                b = MULTIPART_BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(invoice);
        body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/requests/{}/quote", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(body))?;
        self.send(request).await
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "login failed for {}: {}", username, res.text());
        res.json()["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    pub async fn superuser_token(&self) -> Result<String> {
        self.login(SUPERUSER, SUPERUSER_PASSWORD).await
    }

    /// Create an account that has already replaced its temporary password
    pub async fn create_user(&self, username: &str, role: Role, dept: &str, hod_email: &str) -> Result<()> {
        UserService::new(self.pool.clone())
            .create_user(
                SUPERUSER,
                NewUser {
                    username: username.to_string(),
                    password: PASSWORD.to_string(),
                    role,
                    name: format!("{} user", username),
                    email: format!("{}@co.com", username),
                    dept: dept.to_string(),
                    hod_email: hod_email.to_string(),
                },
            )
            .await?;
        sqlx::query("UPDATE users SET force_reset = 0 WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Create an account and log it in
    pub async fn user_token(&self, username: &str, role: Role, dept: &str, hod_email: &str) -> Result<String> {
        self.create_user(username, role, dept, hod_email).await?;
        self.login(username, PASSWORD).await
    }
}

/// The whole cast of a procurement run, one account per role
pub struct Cast {
    pub staff: String,
    pub hod: String,
    pub admin: String,
    pub ss_hod: String,
    pub sac: String,
    pub ed: String,
    pub gmd: String,
    pub accounts: String,
}

impl Cast {
    pub async fn new(app: &TestApp) -> Result<Self> {
        Ok(Self {
            hod: app.user_token("hod", Role::DeptHod, "Finance", "").await?,
            staff: app.user_token("staff", Role::Staff, "Finance", "hod@co.com").await?,
            admin: app.user_token("admin", Role::Admin, "Admin", "").await?,
            ss_hod: app.user_token("sshod", Role::SsHod, "Shared Services", "").await?,
            sac: app.user_token("sac", Role::Sac, "SAC", "").await?,
            ed: app.user_token("ed", Role::Ed, "Executive", "").await?,
            gmd: app.user_token("gmd", Role::Gmd, "Executive", "").await?,
            accounts: app.user_token("accounts", Role::Accounts, "Accounts", "").await?,
        })
    }
}

/// Submit a cart as `token` and return the created request ids
pub async fn submit(app: &TestApp, token: &str, items: Value) -> Result<Vec<String>> {
    let res = app.post("/api/requests", token, json!({ "items": items })).await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "submit failed: {}", res.text());
    let ids = res.json()["data"]
        .as_array()
        .context("submit returned no array")?
        .iter()
        .filter_map(|r| r["id"].as_str().map(str::to_string))
        .collect();
    Ok(ids)
}

/// Current status string of a request, read through the API
pub async fn status_of(app: &TestApp, token: &str, id: &str) -> Result<String> {
    let res = app.get(&format!("/api/requests/{}", id), token).await?;
    anyhow::ensure!(res.status == StatusCode::OK, "get failed: {}", res.text());
    res.json()["data"]["status"]
        .as_str()
        .map(str::to_string)
        .context("request has no status")
}

/// The real server binary on a throwaway database file
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
    _dir: tempfile::TempDir,
}

impl TestServer {
    pub fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("facility.db");

        let child = Command::new(env!("CARGO_BIN_EXE_facility-portal"))
            .env("DATABASE_URL", format!("sqlite://{}?mode=rwc", db_path.display()))
            .env("FACILITY_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child, _dir: dir })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
