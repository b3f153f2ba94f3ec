use super::outcome::{failure, respond};
use crate::extract::JsonOrForm;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use notes::auth::NoteDraft;
use notes::RequestContext;

/// POST /users/{identifier}/notes/add
pub async fn add_note(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(identifier): Path<String>,
    jar: CookieJar,
    JsonOrForm(draft): JsonOrForm<NoteDraft>,
) -> Response {
    match state
        .service
        .add_note(&context, &identifier, draft.clone())
        .await
    {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, Some(draft)),
    }
}

/// POST /notes/{id}/update
pub async fn update_note(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<u64>,
    jar: CookieJar,
    JsonOrForm(draft): JsonOrForm<NoteDraft>,
) -> Response {
    match state.service.update_note(&context, id, draft.clone()).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, Some(draft)),
    }
}

/// POST /notes/{id}/delete
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<u64>,
    jar: CookieJar,
) -> Response {
    match state.service.delete_note(&context, id).await {
        Ok(outcome) => respond(&state, jar, outcome),
        Err(e) => failure(&state, jar, e, None),
    }
}
