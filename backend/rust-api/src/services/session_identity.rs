use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

/// Cookie carrying the anonymous session token.
pub const SESSION_COOKIE: &str = "sessionId";

/// Advisory lifetime; the token stays valid as long as the store references
/// it, the cookie just ages out of the client.
const SESSION_LIFETIME_DAYS: i64 = 30;

/// Accepts a carried non-empty token as-is (possession is trust; there is no
/// store-side validation), otherwise mints a fresh random id. The second
/// element reports whether the id was freshly minted, so the caller knows to
/// set the cookie.
pub fn resolve_session(jar: &CookieJar) -> (String, bool) {
    match carried_session(jar) {
        Some(session_id) => (session_id, false),
        None => (Uuid::new_v4().to_string(), true),
    }
}

/// The session token the caller carried, if any.
pub fn carried_session(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(session_id: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(SESSION_LIFETIME_DAYS))
        .build()
}
