// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnswerOption {
    #[serde(alias = "answer")]
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    #[serde(rename = "isCorrect", alias = "is_correct")]
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: true,
        }
    }

    pub fn wrong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: false,
        }
    }
}

/// A multiple-choice question. Its id is its position in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[serde(alias = "question")]
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,

    /// Ordered options; exactly one of them is correct.
    #[serde(alias = "answerOptions")]
    #[validate(custom(function = validate_options))]
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    /// Index of the correct option, if the question is well formed.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }
}

fn validate_options(options: &[AnswerOption]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("needs_at_least_two_options"));
    }
    for opt in options {
        if opt.text.trim().is_empty() || opt.text.len() > 500 {
            return Err(validator::ValidationError::new("invalid_option_text"));
        }
    }
    if options.iter().filter(|o| o.is_correct).count() != 1 {
        return Err(validator::ValidationError::new("exactly_one_correct_option"));
    }
    Ok(())
}
