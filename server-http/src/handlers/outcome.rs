use crate::api::{ErrorResponse, ProfileResponse};
use crate::cookies::{clear_session, set_flash, set_session, take_flash};
use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use notes::auth::{AuthError, NoteDraft};
use notes::{Outcome, SessionChange};
use tracing::error;

/// Render what an action decided: a 303 carrying cookie changes, or a profile page.
pub fn respond(state: &AppState, jar: CookieJar, outcome: Outcome) -> Response {
    match outcome {
        Outcome::Redirect {
            location,
            flash,
            session,
        } => {
            let jar = match session {
                SessionChange::Unchanged => jar,
                SessionChange::Started(token) => set_session(jar, token, state.secure_cookies),
                SessionChange::Ended => clear_session(jar),
            };
            let jar = match flash {
                Some(flash) => set_flash(jar, &flash, state.secure_cookies),
                None => jar,
            };

            (jar, Redirect::to(&location)).into_response()
        }
        Outcome::Profile { account, notes } => {
            let (jar, flash) = take_flash(jar);
            let body = ProfileResponse {
                account: account.into(),
                notes: notes.into_iter().map(Into::into).collect(),
                flash,
            };

            (jar, Json(body)).into_response()
        }
    }
}

/// Map a failed action onto a response.
///
/// A denial is not an error page: it is the same redirect to `/` whatever
/// the request asked for. `values` is echoed back on validation failures so
/// the form can be refilled.
pub fn failure(
    state: &AppState,
    jar: CookieJar,
    err: AuthError,
    values: Option<NoteDraft>,
) -> Response {
    let (status, body) = match err {
        AuthError::Unauthorized => return respond(state, jar, Outcome::denied()),
        AuthError::Validation(errors) => {
            let body = ErrorResponse::new("Please correct the highlighted fields")
                .with_fields(errors.errors());
            let body = match values {
                Some(values) => body.with_values(values),
                None => body,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, body)
        }
        AuthError::Conflict(_) => (StatusCode::CONFLICT, ErrorResponse::new(err.to_string())),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("Invalid username or password"),
        ),
        AuthError::AccountNotFound | AuthError::NoteNotFound => {
            (StatusCode::NOT_FOUND, ErrorResponse::new(err.to_string()))
        }
        _ => {
            error!("Request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error"),
            )
        }
    };

    (status, jar, Json(body)).into_response()
}
