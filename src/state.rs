// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    questions::QuestionStore,
    session::{SessionLocks, SessionStore},
    views::Views,
};

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<QuestionStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub locks: Arc<SessionLocks>,
    pub views: Arc<Views>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<QuestionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<Views> {
    fn from_ref(state: &AppState) -> Self {
        state.views.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
