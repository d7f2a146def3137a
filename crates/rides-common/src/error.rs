//! Error types for the rides analytics services.

use thiserror::Error;

/// Result type alias using RidesError.
pub type RidesResult<T> = Result<T, RidesError>;

/// Primary error type for rides operations.
#[derive(Debug, Error)]
pub enum RidesError {
    // === Request Errors ===
    #[error("Station not found: {0}")]
    StationNotFound(String),

    // === Store Errors ===
    #[error("Query failed: {0}")]
    QueryFailure(String),

    #[error("Malformed aggregate row: {0}")]
    MalformedAggregateRow(String),

    // === Startup Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RidesError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            RidesError::StationNotFound(_) => 404,
            RidesError::QueryFailure(_)
            | RidesError::MalformedAggregateRow(_)
            | RidesError::Config(_) => 500,
        }
    }

    /// Short label used for error metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RidesError::StationNotFound(_) => "station_not_found",
            RidesError::QueryFailure(_) => "query_failure",
            RidesError::MalformedAggregateRow(_) => "malformed_aggregate_row",
            RidesError::Config(_) => "config",
        }
    }
}

impl From<std::io::Error> for RidesError {
    fn from(err: std::io::Error) -> Self {
        RidesError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for RidesError {
    fn from(err: serde_yaml::Error) -> Self {
        RidesError::Config(format!("YAML error: {}", err))
    }
}
