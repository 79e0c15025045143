//! `AuthUser` extractor: reads the session cookie, verifies it, and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use chirp_service::RequestContext;

use crate::cookie::session_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
///
/// Rejects with 401 when the cookie is absent or its token does not verify,
/// and with 404 when the token names a user that no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &state.config);

        let user = state.sessions.authenticate(token).await?;
        Ok(AuthUser(RequestContext::new(user)))
    }
}
