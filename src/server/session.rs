use super::state::ServerState;
use crate::user::{AuthenticatedSession, SessionToken};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::ops::Deref;
use tracing::{debug, error};

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_id";

/// A live session resolved from the request.
#[derive(Debug)]
pub struct Session(pub AuthenticatedSession);

impl Deref for Session {
    type Target = AuthenticatedSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub enum SessionExtractionError {
    Unauthorized,
    InternalError,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SessionExtractionError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Not authenticated" })),
            )
                .into_response(),
            SessionExtractionError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read session" })),
            )
                .into_response(),
        }
    }
}

/// Reads the session token from the cookie, falling back to the
/// `Authorization` header (`Bearer <token>` or the bare token).
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(|cookie| cookie.value().to_string());

    let token = from_cookie.or_else(|| {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        Some(value.strip_prefix("Bearer ").unwrap_or(value).trim().to_string())
    })?;

    if token.is_empty() {
        None
    } else {
        Some(SessionToken(token))
    }
}

fn extract_session(
    parts: &Parts,
    ctx: &ServerState,
) -> Result<Option<Session>, SessionExtractionError> {
    let Some(token) = session_token_from_headers(&parts.headers) else {
        debug!("No token in cookies nor headers.");
        return Ok(None);
    };

    match ctx.user_manager.validate_session(&token) {
        Ok(Some(session)) => Ok(Some(Session(session))),
        Ok(None) => {
            debug!("Session {:?} not found or expired", token);
            Ok(None)
        }
        Err(err) => {
            error!("Failed to validate session: {:#}", err);
            Err(SessionExtractionError::InternalError)
        }
    }
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session(parts, ctx)?.ok_or(SessionExtractionError::Unauthorized)
    }
}

impl OptionalFromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        extract_session(parts, ctx)
    }
}
