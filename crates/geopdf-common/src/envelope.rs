//! Uniform response envelope returned by every public operation.
//!
//! Expected failures never surface as errors or panics on the caller's side;
//! they are folded into an envelope with `isError = true` and a response code.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, GeoPdfError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    pub message: String,
    pub code: ErrorCode,
    pub is_error: bool,
    pub result: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(message: impl Into<String>, result: T) -> Self {
        Self {
            message: message.into(),
            code: ErrorCode::Success,
            is_error: false,
            result: Some(result),
        }
    }

    /// Failure envelope with no payload.
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            is_error: true,
            result: None,
        }
    }

    /// Build an envelope from an operation outcome.
    pub fn from_result(message: impl Into<String>, outcome: Result<T, GeoPdfError>) -> Self {
        match outcome {
            Ok(result) => Self::success(message, result),
            Err(err) => Self::from(err),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.is_error
    }
}

impl<T> From<GeoPdfError> for ResponseEnvelope<T> {
    fn from(err: GeoPdfError) -> Self {
        let message = match err.fallback_attempted() {
            Some(attempted) => format!("{} [fallbackAttempted={}]", err, attempted),
            None => err.to_string(),
        };
        Self::failure(err.code(), message)
    }
}
