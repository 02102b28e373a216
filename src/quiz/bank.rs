// src/quiz/bank.rs

use std::path::Path;

use validator::Validate;

use crate::{
    error::BankError,
    models::question::{AnswerOption, Question},
};

/// Ordered, non-empty list of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank after checking every question has exactly one correct option.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|e| BankError::InvalidQuestion {
                    index,
                    reason: e.to_string(),
                })?;
        }
        Ok(Self { questions })
    }

    /// Parses a JSON array of questions.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    pub fn load(path: &Path) -> Result<Self, BankError> {
        let raw = std::fs::read_to_string(path)?;
        let bank = Self::from_json(&raw)?;
        tracing::info!(
            "Loaded {} questions from {}",
            bank.len(),
            path.display()
        );
        Ok(bank)
    }

    /// Loads `path` when given, the built-in bank otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, BankError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The ethics and anti-corruption training questions.
    pub fn builtin() -> Self {
        let questions = vec![
            Question::new(
                "A supplier offers you an expensive watch just before a contract renewal. What should you do?",
                vec![
                    AnswerOption::wrong("Accept it, gifts are part of business relationships"),
                    AnswerOption::correct("Politely refuse and report the offer to compliance"),
                    AnswerOption::wrong("Accept it and share it with your team"),
                    AnswerOption::wrong("Accept it once the contract is signed"),
                ],
            ),
            Question::new(
                "What is a facilitation payment?",
                vec![
                    AnswerOption::wrong("A legitimate fee listed in an official price schedule"),
                    AnswerOption::wrong("A discount granted to a loyal customer"),
                    AnswerOption::correct("A small unofficial payment to speed up a routine administrative action"),
                    AnswerOption::wrong("A bank transfer fee"),
                ],
            ),
            Question::new(
                "Which situation is a conflict of interest?",
                vec![
                    AnswerOption::correct("You take part in selecting a supplier owned by a relative"),
                    AnswerOption::wrong("You attend a training session organised by your employer"),
                    AnswerOption::wrong("You negotiate a better price with a long-standing supplier"),
                    AnswerOption::wrong("You share public market data with a colleague"),
                ],
            ),
            Question::new(
                "You suspect a colleague of falsifying expense reports. What is the right reaction?",
                vec![
                    AnswerOption::wrong("Confront the colleague in front of the team"),
                    AnswerOption::wrong("Ignore it, it is not your responsibility"),
                    AnswerOption::wrong("Investigate alone by accessing their files"),
                    AnswerOption::correct("Use the internal whistleblowing channel"),
                ],
            ),
            Question::new(
                "What protects an employee who reports misconduct in good faith?",
                vec![
                    AnswerOption::correct("Whistleblower protection against retaliation"),
                    AnswerOption::wrong("Nothing, reporting is always at the employee's own risk"),
                    AnswerOption::wrong("Only an anonymous report protects the employee"),
                    AnswerOption::wrong("A confidentiality clause in the employment contract"),
                ],
            ),
            Question::new(
                "Why are intermediaries and agents a corruption risk?",
                vec![
                    AnswerOption::wrong("They are always more expensive than direct sales"),
                    AnswerOption::correct("They can pass on bribes on behalf of the company"),
                    AnswerOption::wrong("They never sign written contracts"),
                    AnswerOption::wrong("They are not allowed to work abroad"),
                ],
            ),
            Question::new(
                "What does third-party due diligence consist of?",
                vec![
                    AnswerOption::wrong("Checking that the partner offers the lowest price"),
                    AnswerOption::wrong("Asking the partner to sign a non-disclosure agreement"),
                    AnswerOption::correct("Assessing the integrity and reputation of a partner before working with them"),
                    AnswerOption::wrong("Auditing the partner's IT systems"),
                ],
            ),
            Question::new(
                "A public official hints that a permit will be delayed unless you pay a fee in cash. You should:",
                vec![
                    AnswerOption::wrong("Pay, since the amount is small"),
                    AnswerOption::wrong("Pay and record it as a miscellaneous expense"),
                    AnswerOption::wrong("Ask a local partner to pay instead"),
                    AnswerOption::correct("Refuse, ask for an official receipt and inform your manager"),
                ],
            ),
            Question::new(
                "What is influence peddling?",
                vec![
                    AnswerOption::correct("Using real or supposed influence over a decision maker in exchange for an advantage"),
                    AnswerOption::wrong("Promoting products on social networks"),
                    AnswerOption::wrong("Lobbying that is declared in a public register"),
                    AnswerOption::wrong("Recommending a qualified candidate for a job"),
                ],
            ),
            Question::new(
                "Which of these gifts is generally acceptable?",
                vec![
                    AnswerOption::wrong("Cash or gift cards of any amount"),
                    AnswerOption::wrong("A paid holiday for you and your family"),
                    AnswerOption::correct("A branded pen of modest value, declared according to the gift policy"),
                    AnswerOption::wrong("A discount on a personal purchase from a supplier under tender"),
                ],
            ),
        ];
        Self { questions }
    }
}
