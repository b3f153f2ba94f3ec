pub mod authentication;

pub use authentication::{client_ip, session_middleware};
