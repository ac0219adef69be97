//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - Envelope / document extraction failures        │
//! │  └── ValidationError  - Missing identifiers, bad input                 │
//! │                                                                         │
//! │  meridian-store errors (separate crate)                                │
//! │  └── StoreError       - Device storage failures                        │
//! │                                                                         │
//! │  meridian-client errors (separate crate)                               │
//! │  └── ClientError      - What the mobile UI sees                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → UI                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while interpreting backend payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A slip/PDF response did not carry a base64 document under any known key.
    ///
    /// ## When This Occurs
    /// - Backend returned an empty envelope
    /// - Backend renamed the document field again
    #[error("{entity} PDF not found in response")]
    DocumentNotFound { entity: String },

    /// A base64 document string could not be decoded.
    #[error("Invalid {entity} document encoding: {reason}")]
    InvalidDocument { entity: String, reason: String },

    /// An auth response was missing a field the session needs.
    #[error("Auth response missing {field}")]
    MissingAuthField { field: String },

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any network call so a malformed request is never sent.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given caller-facing field name.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
