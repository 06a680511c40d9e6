// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::OptionLabel;

/// Per-user quiz progress, stored under an opaque session id.
///
/// Invariant: `score <= answer_log.len() <= current_index <= total questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Display name given at login. Presence of a state means "logged in".
    pub username: String,

    /// Index of the next question to present.
    pub current_index: usize,

    /// Number of correct answers so far.
    pub score: usize,

    /// One record per submitted answer, in submission order.
    pub answer_log: Vec<AnswerRecord>,

    pub started_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            current_index: 0,
            score: 0,
            answer_log: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Rewinds progress to the first question, keeping the username.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.answer_log.clear();
        self.started_at = Utc::now();
    }
}

/// Snapshot of a single submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub question_text: String,

    /// The uppercased submission, kept verbatim even when it is not A-D.
    pub selected_label: String,

    pub correct_label: OptionLabel,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Progress report for the result view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub username: String,
    pub score: usize,
    pub total: usize,
    pub answer_log: Vec<AnswerRecord>,
}

/// Form body of `POST /`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter your name to continue."))]
    pub username: String,
}

impl LoginForm {
    /// Trims the submitted name before validation.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
        }
    }
}

/// Form body of `POST /answer`.
#[derive(Debug, Default, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub choice: String,
}
