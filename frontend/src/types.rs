//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Feedback Types** - Message banner shown above the form
//! - **Error Types** - Frontend error handling

use cadastros_common::{GatewayError, ImportError};
use std::fmt;

// =============================================================================
// Feedback Types
// =============================================================================

/// Tone of the feedback banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackLevel {
    Success,
    Error,
}

impl FeedbackLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            FeedbackLevel::Success => "feedback-success",
            FeedbackLevel::Error => "feedback-error",
        }
    }
}

/// The single feedback message of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Error,
            message: message.into(),
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// Logged to the console with detail; the page only shows the generic
/// message of the action that failed.
#[derive(Clone, Debug)]
pub enum AppError {
    /// Network/HTTP error.
    Network(String),
    /// Selected file could not be read.
    File(String),
    /// Spreadsheet could not be parsed.
    Import(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::File(msg) => write!(f, "File error: {}", msg),
            AppError::Import(msg) => write!(f, "Import error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Network(e.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        AppError::Import(e.to_string())
    }
}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
