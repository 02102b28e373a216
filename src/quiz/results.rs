// src/quiz/results.rs

use std::fmt;

use crate::{config::PASSING_SCORE, quiz::session::QuizSession};

/// Terminal view of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub score: u32,
    pub total: u32,
    pub passed: bool,
}

impl ResultsView {
    /// Builds the view; the score is clamped to `[0, total]`.
    pub fn new(score: u32, total: u32) -> Self {
        let score = score.min(total);
        Self {
            score,
            total,
            passed: score >= PASSING_SCORE,
        }
    }

    /// `None` while the session is still in progress.
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        session
            .is_completed()
            .then(|| Self::new(session.score(), session.total()))
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total) * 100.0
    }

    pub fn headline(&self) -> &'static str {
        if self.passed {
            "Congratulations, you passed the quiz!"
        } else {
            "You must retake the quiz."
        }
    }

    /// The certificate is only offered to passing participants.
    pub fn certificate_available(&self) -> bool {
        self.passed
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        write!(
            f,
            "Score: {}/{} ({:.0}%)",
            self.score,
            self.total,
            self.percentage()
        )?;
        if !self.passed {
            write!(f, "\nAt least {} correct answers are required.", PASSING_SCORE)?;
        }
        Ok(())
    }
}
