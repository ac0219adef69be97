//! # Validation Module
//!
//! Input checks that run before a request is built.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile UI (TypeScript)                                       │
//! │  └── Form-level checks, immediate feedback                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Data layer (Rust)                                            │
//! │  └── THIS MODULE: identifiers present, credentials non-empty,          │
//! │      dates parse                                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ERP backend                                                  │
//! │  └── Business rules (not duplicated here)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::validation::{require_identifier, validate_date};
//!
//! assert_eq!(require_identifier("lineUuid", Some(" l-1 ")).unwrap(), "l-1");
//! assert!(require_identifier("lineUuid", None).is_err());
//! assert!(validate_date("actionDueDate", "2025-09-30").is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::Credentials;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifiers
// =============================================================================

/// Returns the trimmed identifier, or `"<field> is required"` when it is
/// absent or blank.
pub fn require_identifier(field: &str, value: Option<&str>) -> ValidationResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::required(field)),
    }
}

// =============================================================================
// Auth Input
// =============================================================================

/// Rejects only the empty string. Secrets are never trimmed: spaces are
/// part of the value.
pub fn require_secret(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Username and password must both be non-blank.
pub fn validate_credentials(credentials: &Credentials) -> ValidationResult<()> {
    if credentials.username.trim().is_empty() {
        return Err(ValidationError::required("username"));
    }
    require_secret("password", &credentials.password)
}

// =============================================================================
// Dates & Periods
// =============================================================================

/// Validates a `YYYY-MM-DD` date as the backend expects it.
pub fn validate_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

/// Calendar month, 1 through 12.
pub fn validate_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }
    Ok(())
}
