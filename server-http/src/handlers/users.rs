use super::outcome::{failure, respond};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use notes::RequestContext;

/// GET /users/{identifier} - Profile page with the account's notes
pub async fn view_profile(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(identifier): Path<String>,
    jar: CookieJar,
) -> Response {
    match state.service.view_profile(&context, &identifier).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, None),
    }
}

/// POST /users/{identifier}/delete - Delete the account, its notes and its sessions
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(identifier): Path<String>,
    jar: CookieJar,
) -> Response {
    match state.service.delete_account(&context, &identifier).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, None),
    }
}
