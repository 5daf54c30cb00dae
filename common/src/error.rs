//! Error types shared by both tiers.
//!
//! - [`ImportError`] - Spreadsheet and workbook reading errors
//! - [`GatewayError`] - API gateway (HTTP client) errors

use thiserror::Error;

// =============================================================================
// Import Errors
// =============================================================================

/// Errors while reading a spreadsheet export.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file has no content at all.
    #[error("Spreadsheet is empty")]
    EmptyFile,

    /// The header row has no usable column names.
    #[error("No headers found in spreadsheet")]
    NoHeaders,

    /// The workbook could not be opened or its first sheet read.
    #[error("Unreadable workbook: {0}")]
    Workbook(String),

    /// Malformed CSV content.
    #[error("Invalid spreadsheet format at line {line}: {message}")]
    Parse { line: u64, message: String },
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        ImportError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Workbook(err.to_string())
    }
}

// =============================================================================
// Gateway Errors
// =============================================================================

/// Errors from an [`ApiGateway`](crate::ApiGateway) call.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Request could not be sent or no response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_format() {
        let err = GatewayError::Status {
            status: 400,
            message: "Missing required fields: name".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("name"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = ImportError::Parse {
            line: 4,
            message: "unequal lengths".into(),
        };
        assert!(err.to_string().contains("line 4"));
    }
}
