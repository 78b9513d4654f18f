//! Error types for readiego-tui
//!
//! Provides TUI-specific error types that wrap service layer errors
//! and terminal/IO errors for unified error handling.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] libreadiego::ReadiegoError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;
