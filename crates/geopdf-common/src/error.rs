//! Error types for the GeoPDF binding.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using GeoPdfError.
pub type GeoPdfResult<T> = Result<T, GeoPdfError>;

/// Response codes surfaced to the calling application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Success,
    ClassNotFound,
    NativeLibraryError,
    FileNotFound,
    FileEmpty,
    FilePermissionDenied,
    GdalOpenFailed,
    RenderError,
    DriverNotFound,
    Error,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Success => "SUCCESS",
            ErrorCode::ClassNotFound => "CLASS_NOT_FOUND",
            ErrorCode::NativeLibraryError => "NATIVE_LIBRARY_ERROR",
            ErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ErrorCode::FileEmpty => "FILE_EMPTY",
            ErrorCode::FilePermissionDenied => "FILE_PERMISSION_DENIED",
            ErrorCode::GdalOpenFailed => "GDAL_OPEN_FAILED",
            ErrorCode::RenderError => "RENDER_ERROR",
            ErrorCode::DriverNotFound => "DRIVER_NOT_FOUND",
            ErrorCode::Error => "ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic reported by the underlying geospatial library.
///
/// `message` is the library's last error message and `error_type` its numeric
/// error class, both copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct LibraryError {
    pub message: String,
    pub error_type: Option<i32>,
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_type {
            Some(error_type) => write!(f, "{} (CPLE {})", self.message, error_type),
            None => f.write_str(&self.message),
        }
    }
}

impl LibraryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
        }
    }

    pub fn with_type(message: impl Into<String>, error_type: i32) -> Self {
        Self {
            message: message.into(),
            error_type: Some(error_type),
        }
    }
}

/// Primary error type for binding operations.
#[derive(Debug, Error)]
pub enum GeoPdfError {
    // === Environment Errors ===
    #[error("Geospatial backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Native library error: {0}")]
    NativeLibrary(String),

    // === Input Errors ===
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File is empty: {0}")]
    FileEmpty(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // === Library Errors ===
    #[error("Failed to open dataset {path}: {diagnostic}")]
    OpenFailed {
        path: String,
        diagnostic: LibraryError,
        fallback_attempted: bool,
    },

    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    // === Output Errors ===
    #[error("Unsupported band layout: {0} band(s)")]
    UnsupportedBandLayout(usize),

    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GeoPdfError {
    /// Create an OpenFailed error from a library diagnostic.
    pub fn open_failed(path: impl Into<String>, diagnostic: LibraryError) -> Self {
        Self::OpenFailed {
            path: path.into(),
            diagnostic,
            fallback_attempted: false,
        }
    }

    /// Create a RenderError.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderError(msg.into())
    }

    /// Get the response code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GeoPdfError::BackendUnavailable(_) => ErrorCode::ClassNotFound,
            GeoPdfError::NativeLibrary(_) => ErrorCode::NativeLibraryError,
            GeoPdfError::FileNotFound(_) => ErrorCode::FileNotFound,
            GeoPdfError::FileEmpty(_) => ErrorCode::FileEmpty,
            GeoPdfError::PermissionDenied(_) => ErrorCode::FilePermissionDenied,
            GeoPdfError::OpenFailed { .. } => ErrorCode::GdalOpenFailed,
            GeoPdfError::DriverNotFound(_) => ErrorCode::DriverNotFound,
            GeoPdfError::UnsupportedBandLayout(_) | GeoPdfError::RenderError(_) => {
                ErrorCode::RenderError
            }
            GeoPdfError::InternalError(_) => ErrorCode::Error,
        }
    }

    /// The library's raw diagnostic message, if this failure carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GeoPdfError::OpenFailed { diagnostic, .. } => Some(diagnostic.message.as_str()),
            _ => None,
        }
    }

    /// Whether the fallback renderer was attempted before this failure was reported.
    pub fn fallback_attempted(&self) -> Option<bool> {
        match self {
            GeoPdfError::OpenFailed {
                fallback_attempted, ..
            } => Some(*fallback_attempted),
            _ => None,
        }
    }

    /// Mark an OpenFailed error with the outcome of the fallback decision.
    pub fn with_fallback_attempted(self, attempted: bool) -> Self {
        match self {
            GeoPdfError::OpenFailed {
                path, diagnostic, ..
            } => GeoPdfError::OpenFailed {
                path,
                diagnostic,
                fallback_attempted: attempted,
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for GeoPdfError {
    fn from(err: std::io::Error) -> Self {
        GeoPdfError::InternalError(err.to_string())
    }
}
