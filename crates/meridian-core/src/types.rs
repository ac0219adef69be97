//! # Domain Types
//!
//! DTOs shared between the data layer and the mobile UI.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ TenantContext   │   │   Pagination    │   │   TokenPair     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cmp_uuid       │   │  start          │   │  access_token   │       │
//! │  │  env_uuid       │   │  length         │   │  refresh_token  │       │
//! │  │  user_uuid      │   │  search_value   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ContextOverrides │   │  StorageKey     │   │  SessionEvent   │       │
//! │  │  caller-supplied│   │  UUID, CMPUUID, │   │  LoggedIn       │       │
//! │  │  identifiers    │   │  ENVUUID, ...   │   │  LoggedOut ...  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend request/response payloads themselves stay untyped
//! (`serde_json::Value`): the ERP server owns their shape.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Tenant Context
// =============================================================================

/// The (company, environment, user) triple that scopes nearly every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TenantContext {
    pub cmp_uuid: String,
    pub env_uuid: String,
    pub user_uuid: String,
}

/// Identifiers a caller may pass explicitly.
///
/// Anything left `None` (or empty) is resolved from device storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContextOverrides {
    pub cmp_uuid: Option<String>,
    pub env_uuid: Option<String>,
    pub user_uuid: Option<String>,
}

impl ContextOverrides {
    /// No overrides: resolve everything from storage.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cmp_uuid(mut self, cmp_uuid: impl Into<String>) -> Self {
        self.cmp_uuid = Some(cmp_uuid.into());
        self
    }

    pub fn with_env_uuid(mut self, env_uuid: impl Into<String>) -> Self {
        self.env_uuid = Some(env_uuid.into());
        self
    }

    pub fn with_user_uuid(mut self, user_uuid: impl Into<String>) -> Self {
        self.user_uuid = Some(user_uuid.into());
        self
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// DataTables-style paging parameters used by every listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Zero-based offset of the first row.
    pub start: u32,
    /// Page size.
    pub length: u32,
    /// Free-text filter, empty for none.
    pub search_value: String,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            start: 0,
            length: crate::DEFAULT_PAGE_LENGTH,
            search_value: String::new(),
        }
    }
}

impl Pagination {
    pub fn new(start: u32, length: u32, search_value: impl Into<String>) -> Self {
        Pagination {
            start,
            length,
            search_value: search_value.into(),
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Access/refresh token pair issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Username/password login input.
#[derive(Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Leads
// =============================================================================

/// Input for moving a business-development lead to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusUpdate {
    pub lead_uuid: String,
    pub status: String,
    /// Free-text next step; sent as "" when absent.
    pub next_action: Option<String>,
    /// `YYYY-MM-DD`; falls back to [`crate::LEGACY_ACTION_DUE_DATE`] when absent.
    pub action_due_date: Option<String>,
}

impl LeadStatusUpdate {
    pub fn new(lead_uuid: impl Into<String>, status: impl Into<String>) -> Self {
        LeadStatusUpdate {
            lead_uuid: lead_uuid.into(),
            status: status.into(),
            next_action: None,
            action_due_date: None,
        }
    }
}

// =============================================================================
// Storage Keys
// =============================================================================

/// Every value the data layer reads from or writes to device storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    Uuid,
    CmpUuid,
    EnvUuid,
    RoleUuid,
    AccessToken,
    RefreshToken,
    Profile,
    DisplayName,
    Roles,
    MenuRights,
    Designation,
    ReportingDesignation,
    AllowedCompanyUuids,
    SelectedCompanyUuid,
    SelectedEnvironmentUuid,
}

impl StorageKey {
    /// All keys, in declaration order.
    pub const ALL: [StorageKey; 15] = [
        StorageKey::Uuid,
        StorageKey::CmpUuid,
        StorageKey::EnvUuid,
        StorageKey::RoleUuid,
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::Profile,
        StorageKey::DisplayName,
        StorageKey::Roles,
        StorageKey::MenuRights,
        StorageKey::Designation,
        StorageKey::ReportingDesignation,
        StorageKey::AllowedCompanyUuids,
        StorageKey::SelectedCompanyUuid,
        StorageKey::SelectedEnvironmentUuid,
    ];

    /// Stable name used by persistent storage backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Uuid => "UUID",
            StorageKey::CmpUuid => "CMPUUID",
            StorageKey::EnvUuid => "ENVUUID",
            StorageKey::RoleUuid => "ROLEUUID",
            StorageKey::AccessToken => "ACCESS_TOKEN",
            StorageKey::RefreshToken => "REFRESH_TOKEN",
            StorageKey::Profile => "PROFILE",
            StorageKey::DisplayName => "DISPLAY_NAME",
            StorageKey::Roles => "ROLES",
            StorageKey::MenuRights => "MENU_RIGHTS",
            StorageKey::Designation => "DESIGNATION",
            StorageKey::ReportingDesignation => "REPORTING_DESIGNATION",
            StorageKey::AllowedCompanyUuids => "ALLOWED_COMPANY_UUIDS",
            StorageKey::SelectedCompanyUuid => "SELECTED_COMPANY_UUID",
            StorageKey::SelectedEnvironmentUuid => "SELECTED_ENVIRONMENT_UUID",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown storage key: '{}'", s))
    }
}

// =============================================================================
// Session Events
// =============================================================================

/// Session lifecycle notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Login or KSP auth succeeded and the session was persisted.
    LoggedIn { user_uuid: String },
    /// Tokens were rotated.
    TokensRefreshed,
    /// Tokens were cleared. `message` is what the UI shows the user.
    LoggedOut { message: String },
}
