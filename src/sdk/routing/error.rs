use serde::{Deserialize, Serialize};
use thiserror::Error;

// Helper structs to parse the JSON error response from ORS
#[derive(Deserialize, Debug)]
pub struct OrsErrorDetail {
    pub code: u32,
    #[serde(default)]
    pub message: String,
}
#[derive(Deserialize, Debug)]
pub struct OrsErrorPayload {
    pub error: OrsErrorDetail,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("OpenRouteService API key is not configured")]
    MissingApiKey,

    #[error("No usable coordinates for destination: {location}")]
    MissingCoordinates { location: String },

    #[error("Rate limit exceeded (HTTP 429): {body}")]
    RateLimited { body: String },

    // This variant hold the structured error from the API
    #[error("API Error (HTTP {status}, Code {code}): {message}")]
    ApiError {
        status: u16,
        code: u32,
        message: String,
    },

    // A fallback for when we get an error that isn't in the expected JSON format
    #[error("Unstructured API Error (HTTP {status}): {body}")]
    RawApiError { status: u16, body: String },

    #[error("No route found in success response")]
    NoRoute,

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),

    #[error("Batch cancelled before this destination was queried")]
    Cancelled,
}

/// Coarse classification of a failed query, stable enough to assert on and
/// to report to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// No provider credential; no request was sent.
    Configuration,
    /// Destination had no usable coordinates; no request was sent.
    Input,
    RateLimited,
    /// Any other non-success HTTP status.
    HttpStatus,
    /// Network failure, timeout, or an unreadable body.
    Transport,
    /// The provider answered but found no route.
    NoRoute,
    Unexpected,
    Cancelled,
}

impl RoutingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RoutingError::MissingApiKey => FailureKind::Configuration,
            RoutingError::MissingCoordinates { .. } => FailureKind::Input,
            RoutingError::RateLimited { .. } => FailureKind::RateLimited,
            RoutingError::ApiError { .. } | RoutingError::RawApiError { .. } => {
                FailureKind::HttpStatus
            }
            RoutingError::RequestError(_) | RoutingError::ParseError(_) => FailureKind::Transport,
            RoutingError::NoRoute => FailureKind::NoRoute,
            RoutingError::Unexpected(_) => FailureKind::Unexpected,
            RoutingError::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Builds the error for a non-success response. A `429` is kept apart
    /// from other statuses; bodies in the ORS error format are parsed.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 {
            return RoutingError::RateLimited { body };
        }
        match serde_json::from_str::<OrsErrorPayload>(&body) {
            Ok(payload) => RoutingError::ApiError {
                status,
                code: payload.error.code,
                message: payload.error.message,
            },
            Err(_) => RoutingError::RawApiError { status, body },
        }
    }
}
