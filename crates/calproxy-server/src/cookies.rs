//! Session cookie helpers.

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use sha2::{Digest, Sha512};

use crate::session::SessionId;

/// Name of the signed session cookie.
pub const SESSION_COOKIE: &str = "calproxy.sid";

/// Derives the cookie signing key from the configured secret.
///
/// SHA-512 yields exactly the 64 bytes [`Key::from`] requires, so any
/// secret length is accepted.
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Builds the session cookie.
///
/// Production deployments serve the frontend from another site, so the
/// cookie must be `Secure; SameSite=None` to be sent on credentialed
/// cross-origin requests.
pub fn session_cookie(id: &SessionId, production: bool) -> Cookie<'static> {
    let same_site = if production {
        SameSite::None
    } else {
        SameSite::Lax
    };

    Cookie::build((SESSION_COOKIE, id.as_str().to_string()))
        .http_only(true)
        .secure(production)
        .same_site(same_site)
        .path("/")
        .build()
}

/// Cookie used to remove the session cookie from the browser.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Reads the session id from a verified cookie, if any.
pub fn session_id(jar: &SignedCookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .map(SessionId::from)
}
