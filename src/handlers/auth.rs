// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use validator::Validate;

use crate::{
    engine::QuizEngine,
    error::AppError,
    models::session::LoginForm,
    questions::QuestionStore,
    session::{SessionId, SessionStore},
    views::Views,
};

/// Notice shown when the login form is submitted without a name.
pub const EMPTY_NAME_NOTICE: &str = "Please enter your name to continue.";

/// Renders the login page.
pub async fn login_page(State(views): State<Arc<Views>>) -> Result<impl IntoResponse, AppError> {
    views.login(None)
}

/// Logs a user in under the current session.
///
/// Any non-empty (trimmed) name is accepted; the session's progress is
/// reset and the user is sent to the first question. An empty name
/// re-renders the login page with a notice and changes nothing.
pub async fn login(
    State(questions): State<Arc<QuestionStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    State(views): State<Arc<Views>>,
    Extension(session_id): Extension<SessionId>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();
    if form.validate().is_err() {
        return Ok(views.login(Some(EMPTY_NAME_NOTICE))?.into_response());
    }

    let state = QuizEngine::new(&questions).login(&form.username);
    sessions.put(&session_id, state).await;
    tracing::info!("User '{}' logged in", form.username);

    Ok(Redirect::to("/quiz").into_response())
}

/// Discards the session's quiz state and returns to the login page.
pub async fn logout(
    State(sessions): State<Arc<dyn SessionStore>>,
    Extension(session_id): Extension<SessionId>,
) -> Redirect {
    if let Some(state) = sessions.get(&session_id).await {
        tracing::info!("User '{}' logged out", state.username);
    }
    sessions.clear(&session_id).await;
    Redirect::to("/")
}
