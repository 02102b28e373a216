// tests/quiz_flow_tests.rs

use std::{sync::Arc, time::Duration};

use quiz_cert::{
    certificate::{CERTIFICATE_FILENAME, CertificateExporter, DirectorySink, ExportOutcome},
    config::Config,
    db,
    models::identity::Identity,
    quiz::{NoticeKind, QuestionBank, QuizController, QuizEvent, SessionState},
    routes,
    state::AppState,
    sync::{HttpScoreClient, ScoreSync},
};
use sqlx::sqlite::SqlitePoolOptions;

async fn spawn_app() -> String {
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
        cors_origins: vec![],
        rust_log: "error".to_string(),
    };

    let app = routes::create_router(AppState { pool, config });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn client(address: &str) -> HttpScoreClient {
    HttpScoreClient::new(address, Duration::from_secs(5)).unwrap()
}

fn identity(email: &str) -> Identity {
    Identity::new(email)
        .with_name("Jane Doe")
        .with_company("Acme")
}

/// Answers every question, the first `correct` of them correctly.
async fn play(controller: &mut QuizController<HttpScoreClient>, correct: usize) -> SessionState {
    let bank = controller.session().shared_bank();
    for (i, question) in bank.questions().iter().enumerate() {
        let right = question.correct_index().unwrap();
        let option = if i < correct {
            right
        } else {
            (right + 1) % question.options.len()
        };
        controller
            .dispatch(QuizEvent::SelectAnswer {
                question: i,
                option,
            })
            .await;
        controller.dispatch(QuizEvent::Next).await;
    }
    controller.session().state()
}

#[tokio::test]
async fn passing_attempt_is_remembered_on_next_mount() {
    let address = spawn_app().await;
    let bank = Arc::new(QuestionBank::builtin());
    let who = identity("pass@corp.test");

    let mut first = QuizController::new(bank.clone(), client(&address), Some(who.clone()));
    first.mount().await;
    assert_eq!(first.notices()[0].kind, NoticeKind::FirstAttempt);

    let state = play(&mut first, 8).await;
    assert_eq!(state, SessionState::Completed { final_score: 8 });
    assert_eq!(first.notices().last().unwrap().kind, NoticeKind::ScoreSaved);

    let mut second = QuizController::new(bank, client(&address), Some(who));
    let state = second.mount().await;
    assert_eq!(state, SessionState::Completed { final_score: 8 });
    assert!(second.results().unwrap().passed);
}

#[tokio::test]
async fn fetch_score_for_new_participant_is_none() {
    let address = spawn_app().await;
    let score = client(&address).fetch_score("new@corp.test").await.unwrap();
    assert_eq!(score, None);
}

#[tokio::test]
async fn failing_attempt_requires_retake_on_next_mount() {
    let address = spawn_app().await;
    let bank = Arc::new(QuestionBank::builtin());
    let who = identity("fail@corp.test");

    let mut first = QuizController::new(bank.clone(), client(&address), Some(who.clone()));
    first.mount().await;
    assert_eq!(play(&mut first, 3).await, SessionState::Completed { final_score: 3 });
    assert!(!first.results().unwrap().passed);

    let mut second = QuizController::new(bank, client(&address), Some(who));
    let state = second.mount().await;
    assert_eq!(state, SessionState::InProgress { current: 0 });
    assert_eq!(second.notices()[0].kind, NoticeKind::MustRetake);
}

#[tokio::test]
async fn unreachable_server_degrades_to_notices() {
    // Grab a free port, then close it so nothing listens there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut controller = QuizController::new(
        Arc::new(QuestionBank::builtin()),
        client(&address),
        Some(identity("offline@corp.test")),
    );
    assert_eq!(controller.mount().await, SessionState::InProgress { current: 0 });
    assert_eq!(controller.notices()[0].kind, NoticeKind::FetchFailed);

    assert_eq!(play(&mut controller, 10).await, SessionState::Completed { final_score: 10 });
    assert_eq!(controller.notices().last().unwrap().kind, NoticeKind::SaveFailed);
}

#[tokio::test]
async fn certificate_export_writes_pdf_and_notifies_server() {
    let address = spawn_app().await;
    let who = identity("cert@corp.test");

    // The participant must exist server side for the notification to succeed.
    let mut controller =
        QuizController::new(Arc::new(QuestionBank::builtin()), client(&address), Some(who.clone()));
    play(&mut controller, 10).await;

    let dir = tempfile::tempdir().unwrap();
    let exporter = CertificateExporter::new(
        Arc::new(DirectorySink::new(dir.path())),
        Arc::new(client(&address)),
    );

    let outcome = exporter.export(Some(&who)).await;
    let expected_path = dir.path().join(CERTIFICATE_FILENAME);
    assert_eq!(
        outcome,
        ExportOutcome::Saved {
            path: expected_path.clone(),
            notified: true
        }
    );
    assert!(!exporter.is_generating());

    let bytes = std::fs::read(&expected_path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/api/certinfo", address))
        .json(&serde_json::json!({ "email": "cert@corp.test" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // One from the exporter, one from this request.
    assert_eq!(body["certificateCount"], 2);
}

#[tokio::test]
async fn certificate_for_unknown_participant_still_saves_locally() {
    let address = spawn_app().await;
    let dir = tempfile::tempdir().unwrap();
    let exporter = CertificateExporter::new(
        Arc::new(DirectorySink::new(dir.path())),
        Arc::new(client(&address)),
    );

    let outcome = exporter.export(Some(&identity("stranger@corp.test"))).await;
    assert!(matches!(outcome, ExportOutcome::Saved { notified: false, .. }));
    assert!(dir.path().join(CERTIFICATE_FILENAME).exists());
}
