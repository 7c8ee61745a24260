use chrono::NaiveDate;
use thiserror::Error;

/// Coarse classification callers use to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    IoFailure,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no class found with id '{0}'")]
    ClassNotFound(String),

    #[error("no booking found with id {0}")]
    BookingNotFound(i32),

    #[error("class '{class}' can't be booked on {date}")]
    Unavailable { class: String, date: NaiveDate },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no free id left for '{0}'")]
    IdExhausted(String),

    #[error("storage was already closed")]
    Closed,

    #[error("storage lock was poisoned")]
    Poisoned,

    #[error("db error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClassNotFound(_) | Self::BookingNotFound(_) => ErrorKind::NotFound,
            Self::Unavailable { .. } | Self::InvalidInput(_) => ErrorKind::InvalidState,
            Self::IdExhausted(_)
            | Self::Closed
            | Self::Poisoned
            | Self::Database(_)
            | Self::Connection(_) => ErrorKind::IoFailure,
        }
    }
}
