// src/models/participant.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'participants' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,

    /// Last persisted quiz score. `None` until the first attempt is saved.
    pub score: Option<i64>,

    pub certificate_count: i64,
    pub last_certificate_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Query string for `GET /api/score`.
#[derive(Debug, Deserialize, Validate)]
pub struct ScoreQuery {
    #[validate(email)]
    pub email: String,
}

/// DTO for `POST /api/score`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SaveScoreRequest {
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 0, max = 1000))]
    pub score: i64,
}

/// DTO for `POST /api/certinfo`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CertInfoRequest {
    #[validate(email)]
    pub email: String,
}

/// Score payload nested under `userData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub score: Option<i64>,
}

/// Envelope shared by both score endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEnvelope {
    pub success: bool,
    #[serde(rename = "userData", default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScoreEnvelope {
    pub fn found(score: Option<i64>) -> Self {
        Self {
            success: true,
            user_data: Some(UserData { score }),
            message: None,
        }
    }
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
