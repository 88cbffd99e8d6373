//! Login, logout, session introspection and password change.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ApiError, ApiJson};
use super::session::{session_token_from_headers, Session, COOKIE_SESSION_TOKEN_KEY};
use super::state::{GuardedUserManager, ServerState};
use super::ServerConfig;
use crate::user::AuthError;

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct UserInfo {
    username: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    user: UserInfo,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody {
    current_password: String,
    new_password: String,
}

/// The cookie expires together with the stored session.
fn session_cookie(
    config: &ServerConfig,
    token: String,
    expires_at: DateTime<Utc>,
) -> anyhow::Result<Cookie<'static>> {
    let expires = time::OffsetDateTime::from_unix_timestamp(expires_at.timestamp())?;
    Ok(Cookie::build((COOKIE_SESSION_TOKEN_KEY, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .expires(expires)
        .build())
}

/// POST /login
async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    debug!("login() called for {}", body.username);
    match state.user_manager.login(&body.username, &body.password) {
        Ok((user, session)) => {
            let cookie = session_cookie(&state.config, session.token.0, session.expires_at)
                .map_err(|err| ApiError::internal("Failed to log in", err))?;
            Ok((
                jar.add(cookie),
                Json(LoginResponse {
                    success: true,
                    user: UserInfo {
                        username: user.username,
                    },
                }),
            ))
        }
        Err(AuthError::InvalidCredentials) => Err(ApiError::Unauthorized("Invalid credentials")),
        Err(AuthError::Validation(msg)) => Err(ApiError::Validation(msg.to_string())),
        Err(AuthError::Internal(err)) => Err(ApiError::internal("Failed to log in", err)),
    }
}

/// POST /logout - always succeeds and clears the cookie.
async fn logout(
    State(user_manager): State<GuardedUserManager>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    if let Some(token) = session_token_from_headers(&headers) {
        if let Err(err) = user_manager.logout(&token) {
            warn!("Failed to delete session on logout: {:#}", err);
        }
    }
    let expired = Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1));
    let jar = jar.add(expired);
    (jar, Json(SuccessResponse { success: true }))
}

/// GET /session
async fn get_session(session: Option<Session>) -> Json<SessionResponse> {
    Json(match session {
        Some(session) => SessionResponse {
            authenticated: true,
            user: Some(UserInfo {
                username: session.user.username.clone(),
            }),
        },
        None => SessionResponse {
            authenticated: false,
            user: None,
        },
    })
}

/// POST /password
async fn change_password(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
    ApiJson(body): ApiJson<ChangePasswordBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    match user_manager.change_password(&session, &body.current_password, &body.new_password) {
        Ok(()) => Ok(Json(SuccessResponse { success: true })),
        Err(AuthError::InvalidCredentials) => {
            Err(ApiError::Unauthorized("Current password is incorrect"))
        }
        Err(AuthError::Validation(msg)) => Err(ApiError::Validation(msg.to_string())),
        Err(AuthError::Internal(err)) => Err(ApiError::internal("Failed to change password", err)),
    }
}

pub fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(get_session))
        .route("/password", post(change_password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cookie_expires_with_session() {
        let expires_at = Utc.with_ymd_and_hms(2030, 5, 17, 8, 30, 15).unwrap();

        let cookie = session_cookie(&ServerConfig::default(), "tok".to_string(), expires_at)
            .unwrap();

        let expires = cookie.expires_datetime().unwrap();
        assert_eq!(expires.unix_timestamp(), expires_at.timestamp());
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
    }
}
