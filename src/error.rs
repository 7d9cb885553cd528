//! Error types for genmave

use thiserror::Error;

use crate::challenge::ChallengeError;

#[derive(Error, Debug)]
pub enum GenmaveError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Challenge error: {0}")]
    Challenge(#[from] ChallengeError),

    #[error("Missing or invalid principal")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<diesel::r2d2::PoolError> for GenmaveError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        GenmaveError::Pool(e.to_string())
    }
}
