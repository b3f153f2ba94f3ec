pub mod auth;
pub mod service;
pub mod validation;

pub use service::{Flash, FlashKind, NotesService, Outcome, RequestContext, SessionChange};
