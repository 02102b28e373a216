// tests/api_tests.rs

use quiz_cert::{config::Config, db, routes, state::AppState};
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    db::migrate(&pool).await.expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        api_base_url: "http://127.0.0.1:0".to_string(),
        certificate_dir: std::env::temp_dir(),
        question_bank_path: None,
        http_timeout_secs: 5,
        cors_origins: vec!["http://localhost:3000".to_string()],
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn save(client: &reqwest::Client, address: &str, email: &str, score: i64) -> reqwest::Response {
    client
        .post(format!("{}/api/score", address))
        .json(&serde_json::json!({ "email": email, "score": score }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn unknown_path_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn get_score_unknown_user_has_null_score() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/score", address))
        .query(&[("email", "nobody@corp.test")])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["userData"]["score"].is_null());
}

#[tokio::test]
async fn save_then_get_score() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = save(&client, &address, "Jane@Corp.test", 8).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    // Emails are case-insensitive.
    let body: serde_json::Value = client
        .get(format!("{}/api/score", address))
        .query(&[("email", "jane@corp.test")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["userData"]["score"], 8);
}

#[tokio::test]
async fn latest_score_replaces_previous() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    save(&client, &address, "retake@corp.test", 9).await;
    save(&client, &address, "retake@corp.test", 4).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/score", address))
        .query(&[("email", "retake@corp.test")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["userData"]["score"], 4);
}

#[tokio::test]
async fn save_score_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let bad_email = save(&client, &address, "not-an-email", 5).await;
    assert_eq!(bad_email.status().as_u16(), 400);
    let body: serde_json::Value = bad_email.json().await.unwrap();
    assert_eq!(body["success"], false);

    let negative = save(&client, &address, "ok@corp.test", -2).await;
    assert_eq!(negative.status().as_u16(), 400);
}

#[tokio::test]
async fn get_score_without_email_is_bad_request() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/score", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn certinfo_counts_certificates() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    save(&client, &address, "cert@corp.test", 10).await;

    for expected in 1..=2 {
        let response = client
            .post(format!("{}/api/certinfo", address))
            .json(&serde_json::json!({ "email": "cert@corp.test" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["certificateCount"], expected);
    }
}

#[tokio::test]
async fn certinfo_unknown_user_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/certinfo", address))
        .json(&serde_json::json!({ "email": "ghost@corp.test" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
