//! Error types for io-backend-bench

use std::io;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Work queue error: {0}")]
    WorkQueue(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Session server and session errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind port {port}: {source}")]
    Bind { port: u16, source: io::Error },

    #[error("Server is not listening")]
    NotListening,

    #[error("Failed to accept client: {0}")]
    Accept(io::Error),

    #[error("Readiness poll failed: {0}")]
    Poll(io::Error),

    #[error("Session read failed after {bytes} bytes: {source}")]
    Read { bytes: u64, source: io::Error },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
