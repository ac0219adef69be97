//! # meridian-client: Data Layer for Meridian Mobile
//!
//! Every screen of the mobile app reaches the ERP backend through this
//! crate. A facade call names an operation; the dispatcher looks up its
//! endpoint descriptor, fills in the tenant context from device storage,
//! expands identifier aliases and pagination keys, attaches the bearer
//! token, sends the request and unwraps the response envelope.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ApiClient::execute                               │
//! │                                                                         │
//! │  facade call (hr().cancel_leave("lv-1"))                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                 │
//! │  │ EndpointSpec │──►│ required ids │──►│ Context      │◄── SessionStore │
//! │  │ (core table) │   │ (no I/O yet) │   │ Resolver     │                 │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘                 │
//! │                                               ▼                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                 │
//! │  │ unwrap Data  │◄──│  Transport   │◄──│ ApiRequest   │◄── bearer,      │
//! │  │ or message   │   │  (reqwest)   │   │ query + body │    IPAddress    │
//! │  └──────────────┘   └──────────────┘   └──────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - `ApiClient` dispatcher and its builder
//! - [`auth`] - Login, token refresh, push registration, logout
//! - [`api`] - Per-domain facades (profile, company, HR, documents, leads)
//! - [`context`] - Tenant context resolution
//! - [`transport`] - `Transport` seam and the reqwest implementation
//! - [`config`] - TOML configuration with environment overrides
//! - [`device`] - Platform hooks (IP address, push token)
//! - [`events`] - Session event notifications for the UI
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - Client error type
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use meridian_client::{ApiClient, ClientConfig};
//! use meridian_core::{Credentials, Pagination};
//! use meridian_store::{Database, DbConfig};
//!
//! meridian_client::init_logging();
//!
//! let db = Database::new(DbConfig::new("meridian.db")).await?;
//! let client = ApiClient::builder()
//!     .with_config(ClientConfig::load_or_default(None))
//!     .with_storage(db.device_storage())
//!     .build()?;
//!
//! client.auth().login(&Credentials::new("asha", "secret")).await?;
//! let leaves = client.hr().leaves(Pagination::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod events;
pub mod logging;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{
    CompanyApi, DocumentsApi, ExpensesApi, HrApi, LeadsApi, ProfileApi, PurchasesApi, SalesApi,
    TimesheetsApi,
};
pub use auth::AuthApi;
pub use client::{ApiClient, ApiClientBuilder, AUDIT_IP_FIELD};
pub use config::{ApiSettings, ClientConfig, DeviceSettings};
pub use context::{ContextResolver, ResolvedContext};
pub use device::{DeviceInfo, NoDeviceInfo, NoPushTokens, PushTokenProvider};
pub use error::{ClientError, ClientResult};
pub use events::{NoOpEmitter, SessionEventEmitter};
pub use logging::init_logging;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
