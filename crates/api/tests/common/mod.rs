//! Shared harness for the HTTP integration tests.
//!
//! Builds the real router (same middleware stack as the binary) over the
//! in-memory repositories and a recording mailer.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use nimba_api::auth::jwt::{generate_access_token, JwtConfig};
use nimba_api::auth::password::hash_password;
use nimba_api::bootstrap::ensure_default_categories;
use nimba_api::config::ServerConfig;
use nimba_api::newsletter::Newsletter;
use nimba_api::router::build_app_router;
use nimba_api::state::AppState;
use nimba_db::models::session::CreateSession;
use nimba_db::models::user::{CreateUser, User};
use nimba_db::Repositories;
use nimba_mail::testing::RecordingMailer;
use nimba_mail::Mailer;
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "mont-nimba-1752";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        site_url: "http://nimba24.test".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub repos: Repositories,
    pub mailer: Arc<RecordingMailer>,
    pub config: ServerConfig,
}

/// An app with the default categories seeded and mail recorded.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_repos(Repositories::in_memory()).await
}

/// An app with mail disabled.
pub async fn spawn_app_without_mail() -> TestApp {
    build(
        Repositories::in_memory(),
        None,
        Arc::new(RecordingMailer::new()),
    )
    .await
}

/// An app over caller-supplied repositories, with mail recorded.
pub async fn spawn_app_with_repos(repos: Repositories) -> TestApp {
    let mailer = Arc::new(RecordingMailer::new());
    build(repos, Some(mailer.clone()), mailer).await
}

async fn build(
    repos: Repositories,
    mailer: Option<Arc<RecordingMailer>>,
    recorder: Arc<RecordingMailer>,
) -> TestApp {
    let config = test_config();
    ensure_default_categories(&repos).await.unwrap();

    let newsletter = Newsletter::new(
        repos.subscriptions.clone(),
        mailer.map(|m| m as Arc<dyn Mailer>),
        config.site_url.clone(),
    )
    .unwrap();

    let state = AppState {
        repos: repos.clone(),
        config: Arc::new(config.clone()),
        newsletter: Arc::new(newsletter),
    };

    TestApp {
        router: build_app_router(state, &config),
        repos,
        mailer: recorder,
        config,
    }
}

impl TestApp {
    pub async fn create_user(&self, username: &str, is_staff: bool) -> User {
        self.repos
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@nimba24.test"),
                password_hash: hash_password(PASSWORD).unwrap(),
                is_staff,
            })
            .await
            .unwrap()
    }

    /// Log in through the API and return the access token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_json(
                "/connexion",
                serde_json::json!({ "username": username, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        json["data"]["access_token"].as_str().unwrap().to_string()
    }

    /// A staff user and a token for it.
    pub async fn staff(&self, username: &str) -> (User, String) {
        let user = self.create_user(username, true).await;
        let token = self.login(username).await;
        (user, token)
    }

    /// A token for any user, bypassing the staff-only login.
    pub async fn token_for(&self, user: &User) -> String {
        let session = self
            .repos
            .sessions
            .create(&CreateSession {
                user_id: user.id,
                expires_at: Utc::now() + Duration::hours(1),
            })
            .await
            .unwrap();
        generate_access_token(user.id, session.id, &self.config.jwt).unwrap()
    }

    pub async fn category_id(&self, key: &str) -> i64 {
        self.repos
            .categories
            .find_by_key(key)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> Response {
        self.send(
            Request::get(uri)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json_auth(&self, uri: &str, token: &str, body: Value) -> Response {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_auth(&self, uri: &str, token: &str) -> Response {
        self.send(
            Request::post(uri)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Subscribe `emails` directly through the newsletter endpoint.
    pub async fn subscribe_all(&self, emails: &[&str]) {
        for email in emails {
            let response = self
                .post_json("/newsletter/subscribe", serde_json::json!({ "email": email }))
                .await;
            assert!(response.status().is_success());
        }
    }

    /// Create an article through the API and return its JSON.
    pub async fn create_article(&self, token: &str, body: Value) -> Value {
        let response = self.post_json_auth("/creer-article", token, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["data"].clone()
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
