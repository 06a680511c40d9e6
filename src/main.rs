// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use quiz_server::config::Config;
use quiz_server::questions::QuestionStore;
use quiz_server::routes;
use quiz_server::session::{MemorySessionStore, SessionLocks, SessionStore, purge_loop};
use quiz_server::state::AppState;
use quiz_server::views::Views;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired sessions are swept from memory.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "quiz.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if config.uses_dev_secret() {
        tracing::warn!("SESSION_SECRET is not set; using the development signing key");
    }

    // The quiz must not be served without questions.
    let questions = match QuestionStore::from_path(&config.questions_csv) {
        Ok(questions) => questions,
        Err(e) => {
            tracing::error!("No questions loaded, refusing to start: {}", e);
            return Err(e.into());
        }
    };

    let views = Views::from_dir(&config.templates_dir).map_err(|e| {
        tracing::error!("Failed to load templates: {:#}", e);
        e
    })?;

    let sessions: Arc<dyn SessionStore> =
        Arc::new(MemorySessionStore::with_ttl_secs(config.session_ttl_secs));
    let locks = Arc::new(SessionLocks::new());

    tokio::spawn(purge_loop(sessions.clone(), locks.clone(), PURGE_INTERVAL));

    // Create AppState
    let state = AppState {
        questions: Arc::new(questions),
        sessions,
        locks,
        views: Arc::new(views),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
