// src/models/question.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four fixed answer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }

    /// Parses a label after trimming and uppercasing, so `" b "` is `B`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "A" => Some(OptionLabel::A),
            "B" => Some(OptionLabel::B),
            "C" => Some(OptionLabel::C),
            "D" => Some(OptionLabel::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated quiz question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier from the source; may be empty and is not required to be unique.
    pub id: String,

    /// The prompt, as written in the source. Never empty.
    pub text: String,

    /// Option text per label (may be empty).
    pub options: BTreeMap<OptionLabel, String>,

    pub correct_label: OptionLabel,
}

impl Question {
    /// Text of one option, empty if the source left it blank.
    pub fn option(&self, label: OptionLabel) -> &str {
        self.options.get(&label).map(String::as_str).unwrap_or_default()
    }
}

/// A raw row of the question CSV.
/// Columns missing from the header deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuestionRow {
    pub id: String,
    pub question: String,
    #[serde(rename = "option_A")]
    pub option_a: String,
    #[serde(rename = "option_B")]
    pub option_b: String,
    #[serde(rename = "option_C")]
    pub option_c: String,
    #[serde(rename = "option_D")]
    pub option_d: String,
    pub correct: String,
}

impl QuestionRow {
    /// Validates the row and turns it into a `Question`.
    ///
    /// * Trims every field and uppercases `correct`.
    /// * Returns `None` when `question` is empty or `correct` is not one of A-D.
    pub fn into_question(self) -> Option<Question> {
        let text = self.question.trim();
        if text.is_empty() {
            return None;
        }
        let correct_label = OptionLabel::parse(&self.correct)?;

        let options = OptionLabel::ALL
            .into_iter()
            .zip([self.option_a, self.option_b, self.option_c, self.option_d])
            .map(|(label, option)| (label, option.trim().to_string()))
            .collect();

        Some(Question {
            id: self.id.trim().to_string(),
            text: text.to_string(),
            options,
            correct_label,
        })
    }
}
