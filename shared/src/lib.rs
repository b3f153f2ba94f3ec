// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
