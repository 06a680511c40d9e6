// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use std::path::PathBuf;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// The views are plain HTML pages, so errors are returned as short text bodies.
/// Internal details are only written to the log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, error_message).into_response()
    }
}

/// Template lookup or rendering failures are server bugs, never user errors.
impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::InternalServerError(format!("template error: {err:#}"))
    }
}

/// A caller asked the engine for something the session state does not allow.
/// Handlers check completion before calling, so reaching this is a bug.
impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Fatal startup error: the question source could not produce a usable quiz.
#[derive(Debug)]
pub enum LoadError {
    /// The source file is missing or unreadable.
    Io { path: PathBuf, source: std::io::Error },

    /// The CSV header could not be read.
    Csv(csv::Error),

    /// Every row was dropped by validation (or there were no rows at all).
    NoValidQuestions { rows: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "cannot read questions from {}: {}", path.display(), source)
            }
            LoadError::Csv(err) => write!(f, "malformed question CSV: {}", err),
            LoadError::NoValidQuestions { rows } => write!(
                f,
                "no valid questions loaded ({} rows read, all rejected)",
                rows
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Csv(err) => Some(err),
            LoadError::NoValidQuestions { .. } => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

/// Precondition violations raised by the quiz engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The session already answered every question.
    OutOfRange { index: usize, total: usize },
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::OutOfRange { index, total } => write!(
                f,
                "question index {} is out of range for a quiz of {} questions",
                index, total
            ),
        }
    }
}

impl std::error::Error for QuizError {}

/// Invalid values in the process environment.
#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
