// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::SESSION_COOKIE, error::AppError, session::SessionId, state::AppState};

/// Session cookie claims.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the opaque session id.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a session token for `session_id`, valid for `expiration_seconds`.
pub fn sign_session_token(
    session_id: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs()
        .saturating_add(expiration_seconds);

    let claims = Claims {
        sub: session_id.to_owned(),
        exp: usize::try_from(expiration).unwrap_or(usize::MAX),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
///
/// Returns the `Claims` if the signature and expiry check out. A failure is
/// not an error for the request: the middleware just starts a new session.
pub fn verify_session_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Extracts the raw session token from the `Cookie` headers, if any.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

/// Axum Middleware: Session.
///
/// * Resolves the session id from the signed `quiz_session` cookie, minting a
///   fresh id when the cookie is absent, forged, or expired.
/// * Holds the per-session lock while the handler runs.
/// * Injects `SessionId` into the request extensions for handlers to use.
/// * Re-issues the cookie on the way out so its lifetime slides with activity.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let secret = &state.config.session_secret;
    let ttl = state.config.session_ttl_secs;

    let claims = session_cookie(req.headers()).and_then(|token| {
        verify_session_token(token, secret)
            .map_err(|e| tracing::debug!("Ignoring session cookie: {}", e))
            .ok()
    });
    let session_id = claims
        .map(|claims| SessionId(claims.sub))
        .unwrap_or_else(|| SessionId(Uuid::new_v4().to_string()));

    let _guard = state.locks.acquire(&session_id).await;
    req.extensions_mut().insert(session_id.clone());

    let mut response = next.run(req).await;

    match sign_session_token(session_id.as_str(), secret, ttl) {
        Ok(token) => {
            let cookie = format!(
                "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl}"
            );
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::error!("Invalid session cookie header: {:?}", e),
            }
        }
        Err(e) => tracing::error!("Failed to sign session token: {}", e),
    }

    response
}
