// src/handlers/certinfo.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::participant::{CertInfoRequest, Participant, normalize_email},
};

/// Records that a participant downloaded a certificate.
pub async fn record_certificate(
    State(pool): State<SqlitePool>,
    Json(req): Json<CertInfoRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let email = normalize_email(&req.email);
    let now = chrono::Utc::now();

    let participant = sqlx::query_as::<_, Participant>(
        r#"
        UPDATE participants
        SET certificate_count = certificate_count + 1,
            last_certificate_at = ?,
            updated_at = ?
        WHERE email = ?
        RETURNING email, score, certificate_count, last_certificate_at, updated_at
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(&email)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    tracing::info!(
        "Certificate #{} issued for {}",
        participant.certificate_count,
        participant.email
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "certificateCount": participant.certificate_count,
        "lastCertificateAt": participant.last_certificate_at,
    })))
}
