// src/routes.rs

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, quiz},
    state::AppState,
    utils::jwt::session_middleware,
};

/// Assembles the main application router.
///
/// * Page routes run behind the session middleware (cookie + per-session lock).
/// * Static assets are served from the configured directory without a session.
/// * Applies global request tracing.
pub fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/start", get(quiz::start))
        .route("/quiz", get(quiz::quiz))
        .route("/answer", post(quiz::answer))
        .route("/result", get(quiz::result))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .merge(page_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        // Global Middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
