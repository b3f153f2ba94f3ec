use super::outcome::{failure, respond};
use crate::api::LoginRequest;
use crate::extract::JsonOrForm;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Response,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::STANDARD, Engine};
use notes::auth::Registration;
use notes::RequestContext;

/// POST /register
///
/// Create an account and sign the browser in as it.
pub async fn register(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    jar: CookieJar,
    JsonOrForm(registration): JsonOrForm<Registration>,
) -> Response {
    match state.service.register(&context, registration).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, None),
    }
}

/// POST /login
///
/// This endpoint accepts either:
/// 1. A JSON or form body: {"username": "alice", "password": "pw1"}
/// 2. Basic Auth header: Authorization: Basic base64(username:password)
///
/// Missing credentials are treated like empty ones and rejected by validation.
pub async fn login(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Result<JsonOrForm<LoginRequest>, Response>,
) -> Response {
    let (username, password) = match body {
        Ok(JsonOrForm(request)) => (request.username, request.password),
        Err(_) => headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_basic_auth)
            .unwrap_or_default(),
    };

    match state.service.login(&context, &username, &password).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, None),
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    jar: CookieJar,
) -> Response {
    match state.service.logout(&context).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, None),
    }
}

/// Extract Basic Auth credentials from Authorization header
fn extract_basic_auth(auth_header: &str) -> Option<(String, String)> {
    // Authorization: Basic <base64>
    let parts: Vec<&str> = auth_header.split_whitespace().collect();

    if parts.len() != 2 || parts[0] != "Basic" {
        return None;
    }

    let decoded = STANDARD.decode(parts[1]).ok()?;
    let decoded_str = String::from_utf8(decoded).ok()?;

    // Split username:password
    let (username, password) = decoded_str.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_auth() {
        let header = format!("Basic {}", STANDARD.encode("alice:pw:with:colons"));
        let (username, password) = extract_basic_auth(&header).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "pw:with:colons");
    }

    #[test]
    fn test_extract_basic_auth_rejects_other_schemes() {
        assert!(extract_basic_auth("Bearer abc123def456").is_none());
        assert!(extract_basic_auth("Basic not-base64!").is_none());
        assert!(extract_basic_auth(&format!("Basic {}", STANDARD.encode("nocolon"))).is_none());
    }
}
