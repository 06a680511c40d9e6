// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    engine::QuizEngine,
    error::AppError,
    models::session::AnswerForm,
    questions::QuestionStore,
    session::{SessionId, SessionStore},
    views::Views,
};

/// Restarts the quiz from the first question, keeping the username.
pub async fn start(
    State(questions): State<Arc<QuestionStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    Extension(session_id): Extension<SessionId>,
) -> Redirect {
    let Some(mut state) = sessions.get(&session_id).await else {
        return Redirect::to("/");
    };

    QuizEngine::new(&questions).restart(&mut state);
    tracing::info!("User '{}' restarted the quiz", state.username);
    sessions.put(&session_id, state).await;

    Redirect::to("/quiz")
}

/// Shows the current question, or sends finished users to their results.
pub async fn quiz(
    State(questions): State<Arc<QuestionStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    State(views): State<Arc<Views>>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, AppError> {
    let Some(state) = sessions.get(&session_id).await else {
        return Ok(Redirect::to("/").into_response());
    };

    let engine = QuizEngine::new(&questions);
    if engine.is_complete(&state) {
        return Ok(Redirect::to("/result").into_response());
    }

    let question = engine.current_question(&state)?;
    let page = views.quiz(question, state.current_index + 1, questions.len())?;
    Ok(page.into_response())
}

/// Records the answer to the current question.
///
/// Redirects to the next question, or to the results after the last one.
/// Submissions after completion are ignored.
pub async fn answer(
    State(questions): State<Arc<QuestionStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    Extension(session_id): Extension<SessionId>,
    Form(form): Form<AnswerForm>,
) -> Result<Redirect, AppError> {
    let Some(mut state) = sessions.get(&session_id).await else {
        return Ok(Redirect::to("/"));
    };

    let engine = QuizEngine::new(&questions);
    if engine.is_complete(&state) {
        return Ok(Redirect::to("/result"));
    }

    let record = engine.submit_answer(&mut state, &form.choice)?;
    tracing::debug!(
        "User '{}' answered question '{}': {} (correct: {})",
        state.username,
        record.question_id,
        record.selected_label,
        record.is_correct
    );

    let complete = engine.is_complete(&state);
    if complete {
        tracing::info!(
            "User '{}' completed the quiz with {}/{}",
            state.username,
            state.score,
            questions.len()
        );
    }
    sessions.put(&session_id, state).await;

    Ok(Redirect::to(if complete { "/result" } else { "/quiz" }))
}

/// Shows the score and answer log.
pub async fn result(
    State(questions): State<Arc<QuestionStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    State(views): State<Arc<Views>>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, AppError> {
    let Some(state) = sessions.get(&session_id).await else {
        return Ok(Redirect::to("/").into_response());
    };

    let summary = QuizEngine::new(&questions).summary(&state);
    Ok(views.result(&summary)?.into_response())
}
