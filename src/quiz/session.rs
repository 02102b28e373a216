// src/quiz/session.rs

use std::sync::Arc;

use crate::{config::PASSING_SCORE, models::question::Question, quiz::bank::QuestionBank};

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress { current: usize },
    Completed { final_score: u32 },
}

/// Inputs accepted by [`QuizSession::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    SelectAnswer { question: usize, option: usize },
    Next,
    Previous,
    Restart,
}

/// Side effects the caller must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PersistScore(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// `Next` was requested while the current question has no answer.
    Unanswered,
    /// The session is completed; only `Restart` applies.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The event was valid but changed nothing (e.g. `Previous` at index 0).
    Unchanged,
    Blocked(BlockReason),
}

/// Result of feeding one event to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

/// Mutable state of one quiz attempt.
///
/// The score is never stored. It is recomputed from `answers` on each read,
/// so repeated selections cannot make it drift.
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    answers: Vec<Option<usize>>,
    state: SessionState,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        let answers = vec![None; bank.len()];
        Self {
            bank,
            answers,
            state: SessionState::InProgress { current: 0 },
        }
    }

    /// Starts from a score loaded remotely.
    ///
    /// Only a passing score skips the quiz; anything lower starts a fresh attempt.
    pub fn resume(bank: Arc<QuestionBank>, prior_score: u32) -> Self {
        let mut session = Self::new(bank);
        let clamped = prior_score.min(session.total());
        if clamped >= PASSING_SCORE {
            session.state = SessionState::Completed {
                final_score: clamped,
            };
        }
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn shared_bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    /// Question count, N.
    pub fn total(&self) -> u32 {
        u32::try_from(self.bank.len()).unwrap_or(u32::MAX)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed { .. })
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SessionState::InProgress { current } => Some(current),
            SessionState::Completed { .. } => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.bank.get(i))
    }

    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Number of questions whose last selection is correct, clamped to `[0, N]`.
    pub fn score(&self) -> u32 {
        if let SessionState::Completed { final_score } = self.state {
            return final_score;
        }
        self.live_score()
    }

    fn live_score(&self) -> u32 {
        let correct = self
            .answers
            .iter()
            .zip(self.bank.questions())
            .filter(|(answer, question)| {
                answer.is_some_and(|opt| question.options.get(opt).is_some_and(|o| o.is_correct))
            })
            .count();
        u32::try_from(correct).unwrap_or(u32::MAX).min(self.total())
    }

    /// Fraction of the quiz reached, in `(0, 1]`. 1 once completed.
    pub fn progress(&self) -> f64 {
        match self.state {
            SessionState::InProgress { current } => (current + 1) as f64 / self.bank.len() as f64,
            SessionState::Completed { .. } => 1.0,
        }
    }

    pub fn passed(&self) -> bool {
        self.is_completed() && self.score() >= PASSING_SCORE
    }

    /// Applies one event and reports what happened.
    pub fn transition(&mut self, event: QuizEvent) -> Transition {
        let (outcome, effects) = match event {
            QuizEvent::SelectAnswer { question, option } => {
                (self.select_answer(question, option), Vec::new())
            }
            QuizEvent::Next => self.go_next(),
            QuizEvent::Previous => (self.go_previous(), Vec::new()),
            QuizEvent::Restart => {
                self.restart();
                (Outcome::Applied, Vec::new())
            }
        };
        Transition {
            state: self.state,
            outcome,
            effects,
        }
    }

    /// Records `option` as the answer to `question`.
    ///
    /// # Panics
    ///
    /// Panics when `question` or `option` is out of range for the bank.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Outcome {
        let options = self
            .bank
            .get(question)
            .map(|q| q.options.len())
            .unwrap_or_else(|| panic!("question index {question} out of range"));
        assert!(
            option < options,
            "option index {option} out of range for question {question} ({options} options)"
        );

        if self.is_completed() {
            return Outcome::Blocked(BlockReason::Completed);
        }
        if self.answers[question] == Some(option) {
            return Outcome::Unchanged;
        }
        self.answers[question] = Some(option);
        Outcome::Applied
    }

    /// Advances, or completes the session from the last question.
    pub fn go_next(&mut self) -> (Outcome, Vec<Effect>) {
        let SessionState::InProgress { current } = self.state else {
            return (Outcome::Blocked(BlockReason::Completed), Vec::new());
        };
        if self.answers[current].is_none() {
            return (Outcome::Blocked(BlockReason::Unanswered), Vec::new());
        }

        if current + 1 < self.bank.len() {
            self.state = SessionState::InProgress {
                current: current + 1,
            };
            (Outcome::Applied, Vec::new())
        } else {
            let final_score = self.live_score();
            self.state = SessionState::Completed { final_score };
            (Outcome::Applied, vec![Effect::PersistScore(final_score)])
        }
    }

    pub fn go_previous(&mut self) -> Outcome {
        match self.state {
            SessionState::InProgress { current } if current > 0 => {
                self.state = SessionState::InProgress {
                    current: current - 1,
                };
                Outcome::Applied
            }
            SessionState::InProgress { .. } => Outcome::Unchanged,
            SessionState::Completed { .. } => Outcome::Blocked(BlockReason::Completed),
        }
    }

    pub fn restart(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.state = SessionState::InProgress { current: 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerOption;

    /// Bank of `n` questions where option 0 is always correct.
    fn bank(n: usize) -> Arc<QuestionBank> {
        let questions = (0..n)
            .map(|i| {
                Question::new(
                    format!("Q{i}"),
                    vec![
                        AnswerOption::correct("right"),
                        AnswerOption::wrong("wrong"),
                        AnswerOption::wrong("also wrong"),
                    ],
                )
            })
            .collect();
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    fn answer_all(session: &mut QuizSession, correct: usize) -> Transition {
        let n = session.bank().len();
        let mut last = None;
        for i in 0..n {
            let option = if i < correct { 0 } else { 1 };
            session.transition(QuizEvent::SelectAnswer {
                question: i,
                option,
            });
            last = Some(session.transition(QuizEvent::Next));
        }
        last.unwrap()
    }

    #[test]
    fn test_initial_state() {
        let session = QuizSession::new(bank(10));
        assert_eq!(session.state(), SessionState::InProgress { current: 0 });
        assert_eq!(session.score(), 0);
        assert!(session.answers().iter().all(Option::is_none));
    }

    #[test]
    fn test_reselection_counts_once() {
        let mut session = QuizSession::new(bank(10));
        session.select_answer(0, 0);
        session.select_answer(0, 1);
        session.select_answer(0, 0);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_repeated_identical_selection_is_unchanged() {
        let mut session = QuizSession::new(bank(10));
        assert_eq!(session.select_answer(2, 0), Outcome::Applied);
        assert_eq!(session.select_answer(2, 0), Outcome::Unchanged);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_correct_to_wrong_decrements() {
        let mut session = QuizSession::new(bank(10));
        session.select_answer(0, 0);
        session.select_answer(1, 0);
        assert_eq!(session.score(), 2);
        session.select_answer(1, 2);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_score_matches_last_selections_for_arbitrary_sequence() {
        let mut session = QuizSession::new(bank(5));
        let sequence = [(0, 1), (0, 0), (3, 0), (3, 0), (4, 2), (3, 1), (1, 0), (4, 0), (2, 2)];
        for (q, o) in sequence {
            session.select_answer(q, o);
            assert!(session.score() <= session.total());
        }
        // Last selections: q0=0, q1=0, q2=2, q3=1, q4=0 -> three correct.
        assert_eq!(session.score(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_option_panics() {
        let mut session = QuizSession::new(bank(3));
        session.select_answer(0, 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_question_panics() {
        let mut session = QuizSession::new(bank(3));
        session.select_answer(3, 0);
    }

    #[test]
    fn test_next_blocked_without_answer() {
        let mut session = QuizSession::new(bank(3));
        let t = session.transition(QuizEvent::Next);
        assert_eq!(t.outcome, Outcome::Blocked(BlockReason::Unanswered));
        assert_eq!(t.state, SessionState::InProgress { current: 0 });
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_navigation() {
        let mut session = QuizSession::new(bank(3));
        assert_eq!(session.go_previous(), Outcome::Unchanged);
        session.select_answer(0, 1);
        session.transition(QuizEvent::Next);
        assert_eq!(session.current_index(), Some(1));
        assert_eq!(session.go_previous(), Outcome::Applied);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.answer(0), Some(1));
    }

    #[test]
    fn test_last_next_completes_with_single_persist_effect() {
        let mut session = QuizSession::new(bank(10));
        let t = answer_all(&mut session, 8);
        assert_eq!(t.state, SessionState::Completed { final_score: 8 });
        assert_eq!(t.effects, vec![Effect::PersistScore(8)]);
        assert!(session.passed());

        let again = session.transition(QuizEvent::Next);
        assert_eq!(again.outcome, Outcome::Blocked(BlockReason::Completed));
        assert!(again.effects.is_empty());
    }

    #[test]
    fn test_selection_after_completion_is_blocked() {
        let mut session = QuizSession::new(bank(2));
        answer_all(&mut session, 1);
        assert_eq!(
            session.select_answer(1, 0),
            Outcome::Blocked(BlockReason::Completed)
        );
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_restart_from_any_state() {
        let mut session = QuizSession::new(bank(4));
        session.select_answer(0, 0);
        session.transition(QuizEvent::Next);
        session.transition(QuizEvent::Restart);
        assert_eq!(session.state(), SessionState::InProgress { current: 0 });
        assert_eq!(session.score(), 0);
        assert!(session.answers().iter().all(Option::is_none));

        answer_all(&mut session, 4);
        assert!(session.is_completed());
        session.restart();
        assert_eq!(session.state(), SessionState::InProgress { current: 0 });
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_resume_with_passing_score() {
        let session = QuizSession::resume(bank(10), 8);
        assert_eq!(session.state(), SessionState::Completed { final_score: 8 });
        assert_eq!(session.score(), 8);
    }

    #[test]
    fn test_resume_with_failing_score_starts_fresh() {
        let session = QuizSession::resume(bank(10), 3);
        assert_eq!(session.state(), SessionState::InProgress { current: 0 });
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_resume_clamps_to_question_count() {
        let session = QuizSession::resume(bank(10), 42);
        assert_eq!(session.state(), SessionState::Completed { final_score: 10 });
    }

    #[test]
    fn test_progress() {
        let mut session = QuizSession::new(bank(4));
        assert_eq!(session.progress(), 0.25);
        session.select_answer(0, 0);
        session.go_next();
        assert_eq!(session.progress(), 0.5);
    }
}
