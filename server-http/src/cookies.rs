use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use notes::Flash;

pub const SESSION_COOKIE: &str = "notes_session";
pub const FLASH_COOKIE: &str = "notes_flash";

fn base_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

pub fn set_session(jar: CookieJar, token: String, secure: bool) -> CookieJar {
    jar.add(base_cookie(SESSION_COOKIE, token, secure))
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(removal(SESSION_COOKIE))
}

pub fn set_flash(jar: CookieJar, flash: &Flash, secure: bool) -> CookieJar {
    match serde_json::to_vec(flash) {
        Ok(bytes) => jar.add(base_cookie(FLASH_COOKIE, URL_SAFE_NO_PAD.encode(bytes), secure)),
        Err(e) => {
            tracing::warn!("Failed to encode flash message: {}", e);
            jar
        }
    }
}

/// Read the pending flash message, if any, and clear it so it is shown once.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let flash = URL_SAFE_NO_PAD
        .decode(cookie.value())
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok());

    (jar.remove(removal(FLASH_COOKIE)), flash)
}
