use thiserror::Error;

/// Errors surfaced by keyed access and cursor dereference.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Keyed access on a key that is not in the map.
    #[error("key not found")]
    KeyNotFound,
    /// A cursor was dereferenced while positioned at the end.
    #[error("cursor is at the end and does not point at an entry")]
    InvalidState,
}

pub type Result<T> = std::result::Result<T, Error>;
