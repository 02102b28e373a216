// src/handlers/score.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::participant::{SaveScoreRequest, ScoreEnvelope, ScoreQuery, normalize_email},
};

/// Returns the last persisted score of a participant.
///
/// An email never seen before answers a `null` score, same as a participant
/// who never finished the quiz.
pub async fn get_score(
    State(pool): State<SqlitePool>,
    Query(params): Query<ScoreQuery>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;
    let email = normalize_email(&params.email);

    let row: Option<(Option<i64>,)> =
        sqlx::query_as("SELECT score FROM participants WHERE email = ?")
            .bind(&email)
            .fetch_optional(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch score: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    let score = row.and_then(|(score,)| score);
    Ok(Json(ScoreEnvelope::found(score)))
}

/// Persists the final score of a quiz attempt.
///
/// Upserts the participant; the latest attempt always replaces the previous score.
pub async fn save_score(
    State(pool): State<SqlitePool>,
    Json(req): Json<SaveScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let email = normalize_email(&req.email);
    let now = chrono::Utc::now();

    sqlx::query(
        r#"
        INSERT INTO participants (email, score, certificate_count, updated_at)
        VALUES (?, ?, 0, ?)
        ON CONFLICT(email) DO UPDATE SET
            score = excluded.score,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&email)
    .bind(req.score)
    .bind(now)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to upsert score: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Score {} saved for {}", req.score, email);

    Ok(Json(ScoreEnvelope::found(Some(req.score))))
}
