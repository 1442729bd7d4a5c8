//! Client error types

use repertoire_core::rules::RulesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Lookup task failed: {0}")]
    Lookup(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No lines found")]
    NoLines,

    #[error("No line number {0}")]
    NoSuchLine(usize),

    #[error(transparent)]
    Rules(#[from] RulesError),
}
