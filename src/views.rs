// src/views.rs

use std::path::Path;

use axum::response::Html;
use minijinja::{Environment, context, path_loader};
use serde::Serialize;

use crate::{
    error::AppError,
    models::{
        question::{OptionLabel, Question},
        session::Summary,
    },
};

const LOGIN: &str = "login.html";
const QUIZ: &str = "quiz.html";
const RESULT: &str = "result.html";

/// One answer slot as shown on the quiz page.
#[derive(Debug, Serialize)]
struct OptionView<'a> {
    label: &'static str,
    text: &'a str,
}

/// Renders the three HTML pages of the quiz.
///
/// Templates are read from disk through a minijinja path loader, so they can
/// be edited without recompiling. `.html` templates are auto-escaped, so
/// question text from the CSV is always shown literally.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Loads templates from `dir` and checks that every page template parses.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir.as_ref().to_path_buf()));

        for name in [LOGIN, QUIZ, RESULT] {
            env.get_template(name)?;
        }

        Ok(Self { env })
    }

    /// Login form, with an optional inline notice.
    pub fn login(&self, flash: Option<&str>) -> Result<Html<String>, AppError> {
        let body = self.env.get_template(LOGIN)?.render(context! { flash })?;
        Ok(Html(body))
    }

    /// Quiz page for `question`, numbered from 1.
    pub fn quiz(
        &self,
        question: &Question,
        number: usize,
        total: usize,
    ) -> Result<Html<String>, AppError> {
        let options: Vec<OptionView<'_>> = OptionLabel::ALL
            .into_iter()
            .map(|label| OptionView {
                label: label.as_str(),
                text: question.option(label),
            })
            .collect();

        let body = self.env.get_template(QUIZ)?.render(context! {
            question => question.text,
            options,
            qnum => number,
            total,
        })?;
        Ok(Html(body))
    }

    /// Result page.
    pub fn result(&self, summary: &Summary) -> Result<Html<String>, AppError> {
        let body = self.env.get_template(RESULT)?.render(context! {
            username => summary.username,
            score => summary.score,
            total => summary.total,
            answers => summary.answer_log,
        })?;
        Ok(Html(body))
    }
}
