//! Auth handlers: signup, login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use chirp_auth::NewIdentity;
use chirp_entity::user::User;

use crate::cookie::{clear_session, set_session};
use crate::dto::request::{LoginRequest, SignupRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(req): ValidJson<SignupRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<User>)> {
    let session = state.sessions.signup(&NewIdentity::from(req)).await?;
    let jar = set_session(jar, &state.config, session.token);
    Ok((StatusCode::CREATED, jar, Json(session.user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<User>)> {
    let session = state.sessions.login(&req.username, &req.password).await?;
    let jar = set_session(jar, &state.config, session.token);
    Ok((jar, Json(session.user)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        clear_session(jar, &state.config),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.0.user)
}
