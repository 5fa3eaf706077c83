//! Error types for the Calmwing domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Calmwing operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Client input errors ---
    #[error("Invalid input: {message}")]
    Input { message: String },

    // --- Generator errors ---
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    // --- Flight data errors ---
    #[error("Flight data error: {0}")]
    Flight(#[from] FlightError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a client input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the external text-generation capability. These are
/// recovered at the orchestrator boundary and surfaced inside the
/// response envelope, never to the HTTP status line.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of the flight-telemetry collaborator. A lookup failure in
/// the request pipeline degrades to the default context; in batch
/// evaluation it is reported per item.
#[derive(Debug, Clone, Error)]
pub enum FlightError {
    #[error("Telemetry source unavailable: {0}")]
    Unavailable(String),

    #[error("Flight not found: {0}")]
    NotFound(String),

    #[error("Malformed telemetry payload: {0}")]
    MalformedPayload(String),

    #[error("Telemetry source not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_error_displays_correctly() {
        let err = Error::Generator(GeneratorError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn input_error_displays_correctly() {
        let err = Error::input("anxiety_level must be between 0 and 10");
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("between 0 and 10"));
    }

    #[test]
    fn flight_error_converts_into_top_level() {
        let err: Error = FlightError::NotFound("UA328".into()).into();
        assert!(err.to_string().contains("UA328"));
    }
}
