#![allow(dead_code)]

use reqwest::Client;
use serde_json::{json, Value};

/// A server running in-process on an ephemeral port with a fresh in-memory
/// database.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

pub async fn spawn_app() -> TestApp {
    let pool = server::db::pool::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    server::db::pool::run_migrations(&pool)
        .await
        .expect("Failed to create schema");

    let app = server::routes::router(pool, server::session::SessionStore::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        client: Client::new(),
    }
}

impl TestApp {
    /// Build a URL for an API endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open a session and return its id.
    pub async fn new_session(&self) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/sessions"))
            .send()
            .await
            .expect("Failed to create session")
            .json()
            .await
            .unwrap();
        body["sessionId"].as_str().unwrap().to_string()
    }

    pub async fn create_profile(&self, username: &str, age: &str, language: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/profiles"))
            .json(&json!({ "username": username, "age": age, "language": language }))
            .send()
            .await
            .expect("Failed to send create profile request")
    }

    pub async fn login(&self, session: &str, username: &str) -> reqwest::Response {
        self.post(session, "/api/session/login", json!({ "username": username }))
            .await
    }

    pub async fn make_move(&self, session: &str, notation: &str) -> reqwest::Response {
        self.post(session, "/api/game/move", json!({ "move": notation }))
            .await
    }

    /// POST with the session bearer and a JSON body.
    pub async fn post(&self, session: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(session)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// POST with the session bearer and no body.
    pub async fn action(&self, session: &str, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(session)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, session: &str, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(session)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn session_view(&self, session: &str) -> Value {
        self.get(session, "/api/session").await.json().await.unwrap()
    }

    /// Create a profile, open a session, and log into it.
    pub async fn logged_in(&self, username: &str) -> String {
        let resp = self.create_profile(username, "30", "en").await;
        assert_eq!(resp.status(), 200);
        let session = self.new_session().await;
        let resp = self.login(&session, username).await;
        assert_eq!(resp.status(), 200);
        session
    }
}
