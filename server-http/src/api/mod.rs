pub mod requests;
pub mod responses;

pub use requests::LoginRequest;
pub use responses::{
    AccountResponse, ErrorResponse, HealthResponse, LandingResponse, NoteResponse,
    ProfileResponse,
};
