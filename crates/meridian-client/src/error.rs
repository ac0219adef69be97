//! # Client Error Types
//!
//! What the mobile UI receives when a call fails.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Precondition   │  │   Transport     │  │     Backend             │ │
//! │  │  (before I/O)   │  │                 │  │                         │ │
//! │  │  MissingIdent.  │  │  Network        │  │  Http {status, body}    │ │
//! │  │  InvalidInput   │  │  Timeout        │  │  UserFacing (slips)     │ │
//! │  │  NotAuthentic.  │  │                 │  │  AllCandidatesFailed    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Storage      │  │  Configuration  │                              │
//! │  │  StoreError     │  │  InvalidConfig  │                              │
//! │  │                 │  │  InvalidUrl     │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ClientError::user_message`] turns any of these into the text the UI
//! shows, using the backend's own message where one exists.

use meridian_core::envelope::extract_error_message;
use meridian_core::{CoreError, ValidationError};
use meridian_store::StoreError;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Precondition Errors
    // =========================================================================
    /// An identifier was neither supplied nor found in device storage.
    ///
    /// ## When This Occurs
    /// - Calling a tenant-scoped endpoint before login
    /// - Calling a line operation without a line UUID
    #[error("{field} is required")]
    MissingIdentifier { field: String },

    /// Caller input failed validation.
    #[error(transparent)]
    InvalidInput(ValidationError),

    /// No tokens are stored for an operation that needs them.
    #[error("Not logged in")]
    NotAuthenticated,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Non-2xx response.
    #[error("HTTP {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: Option<Value>,
    },

    /// A response was well-formed but unusable (missing document, bad auth
    /// payload).
    #[error(transparent)]
    Response(CoreError),

    /// Failure already phrased for the user.
    #[error("{0}")]
    UserFacing(String),

    /// Every candidate query shape of a multi-shape lookup failed.
    #[error("All {attempts} lookups for {endpoint} failed: {last_error}")]
    AllCandidatesFailed {
        endpoint: String,
        attempts: usize,
        last_error: String,
    },

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Required { field } => ClientError::MissingIdentifier { field },
            other => ClientError::InvalidInput(other),
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => v.into(),
            other => ClientError::Response(other),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Serialization(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidUrl(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// True when the failure happened before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ClientError::MissingIdentifier { .. }
                | ClientError::InvalidInput(_)
                | ClientError::NotAuthenticated
        )
    }

    /// True when retrying the same call could succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures and timeouts
    /// - 5xx responses and 429
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout => true,
            ClientError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message to show the user.
    ///
    /// Backend errors use `Message` → `message` → `error` → `errors[0]` →
    /// `statusText`; transport errors map to the network/timeout phrasing.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http {
                status_text, body, ..
            } => extract_error_message(body.as_ref(), Some(status_text), &self.to_string()),
            ClientError::UserFacing(message) => message.clone(),
            ClientError::Network(_) | ClientError::Timeout => {
                extract_error_message(None, None, &self.to_string())
            }
            ClientError::MissingIdentifier { .. }
            | ClientError::InvalidInput(_)
            | ClientError::NotAuthenticated
            | ClientError::Response(_) => self.to_string(),
            _ => extract_error_message(None, None, &self.to_string()),
        }
    }

    /// Re-phrases this error for slip/PDF operations.
    pub(crate) fn into_user_facing(self) -> ClientError {
        if self.is_precondition() {
            return self;
        }
        ClientError::UserFacing(self.user_message())
    }
}
