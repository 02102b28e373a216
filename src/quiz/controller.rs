// src/quiz/controller.rs

use std::sync::Arc;

use crate::{
    error::SyncError,
    models::identity::Identity,
    quiz::{
        bank::QuestionBank,
        notice::Notice,
        results::ResultsView,
        session::{Effect, Outcome, QuizEvent, QuizSession, SessionState, Transition},
    },
    sync::ScoreSync,
};

/// Render step: observes state changes and notices emitted by the controller.
pub trait SessionObserver: Send {
    fn state_changed(&mut self, session: &QuizSession);

    fn notice(&mut self, _notice: &Notice) {}
}

/// Drives a [`QuizSession`] and carries out its side effects.
///
/// Effects are awaited inline, so once `dispatch` returns the score save has
/// either succeeded or produced a notice.
pub struct QuizController<S> {
    session: QuizSession,
    sync: S,
    identity: Option<Identity>,
    observers: Vec<Box<dyn SessionObserver>>,
    notices: Vec<Notice>,
}

impl<S: ScoreSync> QuizController<S> {
    pub fn new(bank: Arc<QuestionBank>, sync: S, identity: Option<Identity>) -> Self {
        Self {
            session: QuizSession::new(bank),
            sync,
            identity,
            observers: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Every notice emitted so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn results(&self) -> Option<ResultsView> {
        ResultsView::from_session(&self.session)
    }

    /// Loads the prior score and picks the initial state.
    ///
    /// Failures only produce a notice; the session then starts fresh.
    pub async fn mount(&mut self) -> SessionState {
        let Some(email) = self.identity.as_ref().map(|i| i.email.clone()) else {
            tracing::debug!("No identity, skipping score fetch");
            self.publish_state();
            return self.session.state();
        };

        let bank = self.session.shared_bank();
        match self.sync.fetch_score(&email).await {
            Ok(Some(prior)) => {
                self.session = QuizSession::resume(bank, prior);
                if !self.session.is_completed() {
                    let shown = prior.min(self.session.total());
                    self.emit(Notice::must_retake(shown));
                }
                tracing::info!("Loaded prior score {} for {}", prior, email);
            }
            Ok(None) => {
                self.session = QuizSession::new(bank);
                self.emit(Notice::first_attempt());
            }
            Err(SyncError::Rejected(message)) => {
                tracing::info!("Score fetch rejected: {}", message);
                self.emit(Notice::server_message(message));
            }
            Err(e) => {
                tracing::error!("Failed to fetch score: {:?}", e);
                self.emit(Notice::fetch_failed());
            }
        }

        self.publish_state();
        self.session.state()
    }

    /// Applies an event, notifies observers, then runs resulting effects.
    pub async fn dispatch(&mut self, event: QuizEvent) -> Transition {
        let transition = self.session.transition(event);
        if transition.outcome == Outcome::Applied {
            self.publish_state();
        }
        for effect in &transition.effects {
            self.run_effect(*effect).await;
        }
        transition
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PersistScore(score) => {
                let Some(email) = self.identity.as_ref().map(|i| i.email.clone()) else {
                    tracing::debug!("No identity, score {} not persisted", score);
                    return;
                };
                match self.sync.save_score(&email, score).await {
                    Ok(()) => {
                        tracing::info!("Saved score {} for {}", score, email);
                        self.emit(Notice::score_saved());
                    }
                    Err(e) => {
                        tracing::error!("Failed to save score: {:?}", e);
                        self.emit(Notice::save_failed());
                    }
                }
            }
        }
    }

    fn publish_state(&mut self) {
        for observer in &mut self.observers {
            observer.state_changed(&self.session);
        }
    }

    fn emit(&mut self, notice: Notice) {
        for observer in &mut self.observers {
            observer.notice(&notice);
        }
        self.notices.push(notice);
    }
}
