#![allow(dead_code)]

use pms_backoffice::{
    api::router::create_router,
    config::Config,
    domain::models::{role::Role, user::User},
    infra::factory::{run_sqlite_migrations, state_from_sqlite_pool},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cret-pass";

/// Browser-side state after a successful login.
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

impl Session {
    pub fn cookie(&self) -> String {
        format!("access_token={}; refresh_token={}", self.access_token, self.refresh_token)
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            bootstrap_admin_username: "admin".to_string(),
            secure_cookies: false,
        };

        let state = Arc::new(state_from_sqlite_pool(&config, pool.clone()).expect("Failed to build state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Creates a user holding `role` with [`PASSWORD`] and a phone number,
    /// so every required field of the editor is filled.
    pub async fn seed_user(&self, username: &str, role: Role) -> User {
        let mut user = User::new(
            "Test".to_string(),
            "User".to_string(),
            format!("{}@example.com", username),
            username.to_string(),
            role,
            String::new(),
        );
        user.phone_number = Some("08030000000".to_string());
        self.state.user_directory.create_user(user, PASSWORD).await.expect("Failed to seed user")
    }

    pub async fn try_login(&self, username: &str, password: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(&[("username", username), ("password", password)])))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> Session {
        let response = self.try_login(username, password).await;

        if !response.status().is_redirection() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let access_token = set_cookie(&response, "access_token").expect("No access_token cookie returned");
        let refresh_token = set_cookie(&response, "refresh_token").expect("No refresh_token cookie returned");

        // The CSRF token travels inside the signed access token; read it
        // back from the rendered logout form.
        let dashboard = self.router.clone().oneshot(
            Request::builder()
                .uri("/dashboard")
                .header(header::COOKIE, format!("access_token={}", access_token))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();
        let html = body_text(dashboard).await;
        let csrf_token = extract_csrf(&html).expect("No csrf_token in page");

        Session { access_token, refresh_token, csrf_token }
    }

    pub async fn get(&self, session: &Session, uri: &str) -> Response {
        self.get_with_cookies(&session.cookie(), uri).await
    }

    pub async fn get_with_cookies(&self, cookies: &str, uri: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookies)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    /// Posts an HTML form, adding the session's CSRF token.
    pub async fn post_form(&self, session: &Session, uri: &str, fields: &[(&str, &str)]) -> Response {
        let mut fields = fields.to_vec();
        fields.push(("csrf_token", session.csrf_token.as_str()));
        self.post_raw(session, uri, &fields).await
    }

    pub async fn post_raw(&self, session: &Session, uri: &str, fields: &[(&str, &str)]) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, session.cookie())
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(fields)))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn user(&self, id: &str) -> Option<User> {
        self.state.user_directory.find_by_id(id).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .map(|c| {
            let value = &c[prefix.len()..];
            value.split(';').next().unwrap_or(value).to_string()
        })
}

pub fn location(response: &Response) -> String {
    response.headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn extract_csrf(html: &str) -> Option<String> {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}
