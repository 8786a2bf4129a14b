// tests/common/mod.rs

#![allow(dead_code)]

use lms_backend::{
    config::Config,
    routes,
    state::AppState,
    utils::{hash::hash_password, policy},
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
}

/// Spawns the app on a random port against a fresh in-memory database.
/// The pool is pinned to a single connection so the in-memory database
/// lives for the whole test.
pub async fn spawn_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        admin_username: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, pool }
}

pub async fn seed_course(pool: &SqlitePool, title: &str) -> i64 {
    sqlx::query("INSERT INTO courses (title, description) VALUES (?, '')")
        .bind(title)
        .execute(pool)
        .await
        .expect("Failed to seed course")
        .last_insert_rowid()
}

pub async fn login(
    client: &reqwest::Client,
    address: &str,
    username: &str,
    password: &str,
) -> String {
    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    response["token"]
        .as_str()
        .expect("Token not found")
        .to_string()
}

/// Registers a fresh student through the API and returns their token.
pub async fn student_token(client: &reqwest::Client, address: &str) -> String {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    login(client, address, &username, "password123").await
}

/// Seeds an admin directly in the database and returns their token.
pub async fn admin_token(app: &TestApp, client: &reqwest::Client) -> String {
    let username = format!("adm_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let hashed = hash_password("password123").unwrap();

    sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
        .bind(&username)
        .bind(&hashed)
        .bind(policy::ROLE_ADMIN)
        .execute(&app.pool)
        .await
        .expect("Failed to seed admin");

    login(client, &app.address, &username, "password123").await
}
