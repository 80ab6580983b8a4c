/*!
 * Error types for the hardsubber application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while driving the external encoder process
#[derive(Error, Debug)]
pub enum EncoderError {
    /// The encoder or probe binary could not be found
    #[error("Encoder binary not found: {0}")]
    MissingBinary(String),

    /// The encoder process could not be started
    #[error("Failed to start encoder process: {0}")]
    SpawnFailed(String),

    /// The encoder exited with a failure status
    #[error("Encoder exited with status {code}: {detail}")]
    ExitStatus {
        /// Process exit code (-1 when terminated by a signal)
        code: i32,
        /// Filtered encoder stderr
        detail: String,
    },

    /// The probe command did not finish within its deadline
    #[error("Encoder command timed out after {0} seconds")]
    Timeout(u64),

    /// The probe command ran but produced no usable result
    #[error("Probe failed: {0}")]
    Probe(String),

    /// The user interrupted the encode
    #[error("Encoding cancelled by user")]
    Cancelled,

    /// I/O failure while talking to the encoder process
    #[error("Encoder I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the encoder
    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
