//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use chirp_core::config::AppConfig;

/// Add the session cookie carrying `token` to `jar`.
///
/// The cookie is `HttpOnly`, `SameSite=Strict`, scoped to `/`, lives as long
/// as the token, and is marked `Secure` outside development.
pub fn set_session(jar: CookieJar, config: &AppConfig, token: String) -> CookieJar {
    let ttl_days = i64::try_from(config.auth.session_ttl_days).unwrap_or(i64::MAX / 86_400);
    let cookie = Cookie::build((config.auth.cookie_name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::days(ttl_days))
        .secure(!config.is_development());
    jar.add(cookie)
}

/// Expire the session cookie.
pub fn clear_session(jar: CookieJar, config: &AppConfig) -> CookieJar {
    let cookie = Cookie::build((config.auth.cookie_name.clone(), ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::ZERO);
    jar.add(cookie)
}

/// The session token presented with a request, if any.
pub fn session_token<'a>(jar: &'a CookieJar, config: &AppConfig) -> Option<&'a str> {
    jar.get(&config.auth.cookie_name).map(|c| c.value())
}
