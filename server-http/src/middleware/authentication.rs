use crate::api::ErrorResponse;
use crate::cookies::session_token;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

/// Extract the client IP address from proxy headers
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("X-Real-IP")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

/// Session middleware
///
/// Resolves the session cookie once per request and attaches the resulting
/// `RequestContext` to the request extensions. Handlers receive it through
/// `Extension<RequestContext>` and pass it on explicitly.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = session_token(&jar);
    let ip = client_ip(request.headers());

    let context = match state.service.resolve(token, ip).await {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to resolve session: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response());
        }
    };

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}
