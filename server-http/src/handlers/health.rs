use crate::api::{HealthResponse, LandingResponse};
use crate::cookies::take_flash;
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use notes::RequestContext;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "OK".into(),
    })
}

/// GET / - Landing page; shows who is signed in and any pending notice
pub async fn landing(
    Extension(context): Extension<RequestContext>,
    jar: CookieJar,
) -> (CookieJar, Json<LandingResponse>) {
    let (jar, flash) = take_flash(jar);

    (
        jar,
        Json(LandingResponse {
            signed_in_as: context.identity.map(|identity| identity.into_inner()),
            flash,
        }),
    )
}
