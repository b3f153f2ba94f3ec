pub mod api;
pub mod cookies;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types
pub use routes::{build_router, App};
pub use state::AppState;
