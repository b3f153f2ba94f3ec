use crate::handlers;
use crate::middleware::session_middleware;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use shared::config::Config;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;
use tracing::warn;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// The routed application, with trailing slashes trimmed before routing.
pub type App = NormalizePath<Router>;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> App {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::landing))
        // Session routes
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        // Account routes
        .route("/users/{identifier}", get(handlers::view_profile))
        .route("/users/{identifier}/delete", post(handlers::delete_account))
        // Note routes
        .route("/users/{identifier}/notes/add", post(handlers::add_note))
        .route("/notes/{id}/update", post(handlers::update_note))
        .route("/notes/{id}/delete", post(handlers::delete_note))
        // Middleware
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Outside the router: a `Router::layer` runs only after a route matched.
    NormalizePath::trim_trailing_slash(router)
}
