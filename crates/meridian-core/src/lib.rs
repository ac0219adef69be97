//! # meridian-core: Backend Contract for Meridian Mobile
//!
//! Everything the mobile data layer knows about the ERP backend that can be
//! stated without doing I/O: which endpoints exist, how their parameters are
//! named, how responses are wrapped and how failures are phrased for users.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian Mobile Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (TypeScript)                       │   │
//! │  │    Attendance ──► Leaves ──► Documents ──► Leads               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              meridian-client (dispatcher, facades)              │   │
//! │  └───────────────┬─────────────────────────────┬───────────────────┘   │
//! │                  │                             │                        │
//! │  ┌───────────────▼───────────────┐  ┌──────────▼────────────────────┐  │
//! │  │  ★ meridian-core (THIS) ★     │  │  meridian-store               │  │
//! │  │  endpoint table, envelopes,   │  │  device storage, session      │  │
//! │  │  validation, DTOs             │  │                               │  │
//! │  │  NO I/O                       │  │                               │  │
//! │  └───────────────────────────────┘  └───────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`endpoint`] - Declarative endpoint descriptors and path overrides
//! - [`envelope`] - Response unwrapping, document lookup, error messages
//! - [`request`] - Methods, bodies, per-call arguments
//! - [`types`] - DTOs shared with the UI
//! - [`error`] - Domain error types
//! - [`validation`] - Pre-request input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::endpoint::{DocumentKind, DocumentOp, Endpoint};
//! use meridian_core::envelope::unwrap_envelope;
//! use serde_json::json;
//!
//! let spec = Endpoint::Document(DocumentKind::SalesOrder, DocumentOp::List).spec();
//! assert_eq!(spec.key, "SALES_ORDER_LIST");
//!
//! let payload = unwrap_envelope(json!({ "Data": [{ "UUID": "so-1" }] }));
//! assert_eq!(payload[0]["UUID"], "so-1");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod request;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use endpoint::{DocumentKind, DocumentOp, Endpoint, EndpointSpec, PathTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use request::{CallArgs, FileAttachment, FormData, HttpMethod, RequestBody};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when a caller does not pass one.
pub const DEFAULT_PAGE_LENGTH: u32 = 10;

/// `ActionDueDate` sent on lead status updates when the caller gives none.
pub const LEGACY_ACTION_DUE_DATE: &str = "2025-09-30";
