//! Error type for the attendance tracker.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("could not connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// A protected operation ran without a signed-in session.
    #[error("not signed in")]
    Unauthenticated,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with email {0:?} already exists")]
    EmailTaken(String),

    #[error("invalid attendance status: {0:?}")]
    InvalidStatus(String),

    #[error("{0}")]
    Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
