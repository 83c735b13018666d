//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// No phase of the program covers the requested week
    #[error("No phase covers week {week}")]
    PhaseNotFound { week: u32 },

    /// Template id is not known to the store or the catalog
    #[error("Workout template not found: {0}")]
    TemplateNotFound(String),

    /// Week number outside the range the program accepts
    #[error("Week must be between 1 and {max}, got {week}")]
    InvalidWeek { week: u32, max: u32 },

    /// Malformed exercise log input
    #[error("Invalid exercise log: {0}")]
    InvalidLog(String),

    /// Storage collaborator error
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
