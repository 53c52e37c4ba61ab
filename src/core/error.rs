

use std::time::Duration;

use thiserror::Error;

use crate::matcher::ScoringError;


#[derive(Error, Debug)]
pub enum SmartfillError {
    #[error("Matcher not ready after {0:?}")]
    InitializationTimeout(Duration),

    #[error("No questions detected after waiting {0:?}")]
    NoQuestionsFound(Duration),

    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(#[from] ScoringError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SmartfillError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}


pub type Result<T> = std::result::Result<T, SmartfillError>;
