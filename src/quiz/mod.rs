// src/quiz/mod.rs

pub mod bank;
pub mod controller;
pub mod notice;
pub mod results;
pub mod session;

pub use bank::QuestionBank;
pub use controller::{QuizController, SessionObserver};
pub use notice::{Notice, NoticeKind, Severity};
pub use results::ResultsView;
pub use session::{BlockReason, Effect, Outcome, QuizEvent, QuizSession, SessionState, Transition};
