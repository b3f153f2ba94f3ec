pub mod auth;
pub mod health;
pub mod notes;
pub mod outcome;
pub mod users;

pub use auth::{login, logout, register};
pub use health::{health_check, landing};
pub use self::notes::{add_note, delete_note, update_note};
pub use users::{delete_account, view_profile};
