// src/quiz/notice.rs

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// What a notice is about, so callers can match without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    FirstAttempt,
    MustRetake,
    ServerMessage,
    FetchFailed,
    ScoreSaved,
    SaveFailed,
}

impl Notice {
    pub fn first_attempt() -> Self {
        Self::info(NoticeKind::FirstAttempt, "First attempt", "Good luck with your exam!")
    }

    pub fn must_retake(score: u32) -> Self {
        Self::info(
            NoticeKind::MustRetake,
            "Insufficient score",
            format!("Your score is {score}, you must retake the exam."),
        )
    }

    pub fn server_message(message: impl Into<String>) -> Self {
        Self::info(NoticeKind::ServerMessage, "Message", message)
    }

    pub fn fetch_failed() -> Self {
        Self::destructive(NoticeKind::FetchFailed, "Error", "Unable to fetch your score")
    }

    pub fn score_saved() -> Self {
        Self::info(
            NoticeKind::ScoreSaved,
            "Score saved",
            "Your score has been saved successfully.",
        )
    }

    pub fn save_failed() -> Self {
        Self::destructive(NoticeKind::SaveFailed, "Error", "Unable to save your score")
    }

    fn info(kind: NoticeKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    fn destructive(kind: NoticeKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
