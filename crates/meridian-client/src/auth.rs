//! # Auth Flows
//!
//! Login, token refresh, KSP device login and logout. These are the only
//! operations that write the session to device storage.
//!
//! ## Login Persistence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Response Data                         Device storage                   │
//! │  ─────────────                         ──────────────                   │
//! │  UUID                              ──► UUID                             │
//! │  Roles[0].EnvironmentUUID          ──► ENVUUID                          │
//! │  Roles[0].CompanyUUID              ──► CMPUUID                          │
//! │  RoleUUID | Roles[0].RoleUUID      ──► ROLEUUID                         │
//! │  Token.AccessToken / RefreshToken  ──► ACCESS_TOKEN / REFRESH_TOKEN     │
//! │  Roles[*].UserRoleName             ──► ROLES (JSON array)               │
//! │  Roles[*].CompanyUUID (distinct)   ──► ALLOWED_COMPANY_UUIDS            │
//! │  SelectedCompanyUUID | Roles[0]    ──► SELECTED_COMPANY_UUID            │
//! │  SelectedEnvironmentUUID | Roles[0]──► SELECTED_ENVIRONMENT_UUID        │
//! │  Profile, DisplayName, MenuRights,                                      │
//! │  Designation, ReportingDesignation ──► same-named keys                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Each value is written only when present in the response.

use serde_json::{json, Value};
use tracing::{debug, info};

use meridian_core::validation::{require_identifier, validate_credentials};
use meridian_core::{CallArgs, CoreError, Credentials, Endpoint, SessionEvent, TokenPair};
use meridian_store::SessionStore;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Message carried by [`SessionEvent::LoggedOut`].
pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        AuthApi { client }
    }

    /// Username/password login. Returns the response `Data` untouched.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Value> {
        validate_credentials(credentials)?;
        info!(username = %credentials.username, "Logging in");

        let body = json!({
            "UserName": credentials.username.trim(),
            "Password": credentials.password,
        });
        let data = self
            .client
            .execute(Endpoint::Login, CallArgs::new().json(body))
            .await?;

        self.complete_login(data).await
    }

    /// Device-key login used by kiosk/shared devices.
    pub async fn ksp_auth(&self, device_key: &str) -> ClientResult<Value> {
        let device_key = require_identifier("deviceKey", Some(device_key))?;
        info!("Logging in with device key");

        let data = self
            .client
            .execute(
                Endpoint::KspAuth,
                CallArgs::new().json(json!({ "DeviceKey": device_key })),
            )
            .await?;

        self.complete_login(data).await
    }

    async fn complete_login(&self, data: Value) -> ClientResult<Value> {
        if !data.is_object() {
            return Err(CoreError::MissingAuthField {
                field: "Data".into(),
            }
            .into());
        }

        persist_session(self.client.session(), &data).await?;

        let user_uuid = str_field(&data, "UUID").unwrap_or_default().to_string();
        info!(user_uuid = %user_uuid, "Login succeeded, session persisted");
        self.client.emit(SessionEvent::LoggedIn { user_uuid });

        let client = self.client.clone();
        self.client
            .spawn_background("register_device_token", async move {
                client.auth().register_device_token().await.map(|_| ())
            });

        Ok(data)
    }

    /// Exchanges the stored refresh token for a new pair.
    pub async fn refresh_token(&self) -> ClientResult<TokenPair> {
        let session = self.client.session();
        let tokens = session.tokens().await?.ok_or(ClientError::NotAuthenticated)?;

        let body = json!({
            "AccessToken": tokens.access_token,
            "RefreshToken": tokens.refresh_token,
        });
        let data = self
            .client
            .execute(Endpoint::RefreshToken, CallArgs::new().json(body))
            .await?;

        let fresh = token_pair(&data).ok_or_else(|| CoreError::MissingAuthField {
            field: "Token".into(),
        })?;
        session.set_tokens(&fresh).await?;

        info!("Access token refreshed");
        self.client.emit(SessionEvent::TokensRefreshed);
        Ok(fresh)
    }

    /// Registers this device's push token for the stored user.
    ///
    /// Returns `Ok(None)` when the platform has no token to register.
    pub async fn register_device_token(&self) -> ClientResult<Option<Value>> {
        let Some(token) = self.client.push_tokens().device_token().await? else {
            debug!("No push token available, skipping registration");
            return Ok(None);
        };

        let device = self.client.device_settings();
        let body = json!({
            "DeviceToken": token,
            "Platform": device.platform,
            "DeviceId": device.id,
            "AppVersion": device.app_version,
        });
        let payload = self
            .client
            .execute(Endpoint::RegisterDeviceToken, CallArgs::new().json(body))
            .await?;
        Ok(Some(payload))
    }

    /// Logs out locally and removes the push token server-side.
    ///
    /// The removal request is built while the access token still exists and
    /// sent in the background; its failure never blocks logout. Nothing is
    /// sent when the platform has no push token.
    pub async fn logout(&self) -> ClientResult<()> {
        let removal = self.removal_request().await;

        match removal {
            Ok(Some(request)) => {
                let client = self.client.clone();
                self.client
                    .spawn_background("remove_device_token", async move {
                        let spec = Endpoint::RemoveDeviceToken.spec();
                        client.send_request(&spec, request).await.map(|_| ())
                    });
            }
            Ok(None) => debug!("No push token available, skipping removal"),
            Err(e) => debug!(error = %e, "Skipping device token removal"),
        }

        self.client.session().clear_tokens().await?;
        info!("Logged out");
        self.client.emit(SessionEvent::LoggedOut {
            message: LOGGED_OUT_MESSAGE.to_string(),
        });
        Ok(())
    }

    async fn removal_request(&self) -> ClientResult<Option<crate::transport::ApiRequest>> {
        let Some(token) = self.client.push_tokens().device_token().await? else {
            return Ok(None);
        };

        let device = self.client.device_settings();
        let body = json!({
            "DeviceToken": token,
            "DeviceId": device.id,
            "Platform": device.platform,
        });
        let request = self
            .client
            .build_request(
                &Endpoint::RemoveDeviceToken.spec(),
                CallArgs::new().json(body),
            )
            .await?;
        Ok(Some(request))
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

fn str_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Tokens under `Token`, or at the top level of the payload.
fn token_pair(data: &Value) -> Option<TokenPair> {
    let holder = data.get("Token").filter(|t| t.is_object()).unwrap_or(data);
    let access = str_field(holder, "AccessToken")?;
    let refresh = str_field(holder, "RefreshToken")?;
    Some(TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    })
}

async fn persist_session(session: &SessionStore, data: &Value) -> ClientResult<()> {
    let roles: &[Value] = data
        .get("Roles")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let first_role = roles.first();
    let from_first_role = |key: &str| first_role.and_then(|role| str_field(role, key));

    if let Some(uuid) = str_field(data, "UUID") {
        session.set_uuid(uuid).await?;
    }
    if let Some(env) = from_first_role("EnvironmentUUID") {
        session.set_env_uuid(env).await?;
    }
    if let Some(cmp) = from_first_role("CompanyUUID") {
        session.set_cmp_uuid(cmp).await?;
    }
    if let Some(role_uuid) = str_field(data, "RoleUUID").or_else(|| from_first_role("RoleUUID")) {
        session.set_role_uuid(role_uuid).await?;
    }
    if let Some(tokens) = token_pair(data) {
        session.set_tokens(&tokens).await?;
    }

    let role_names: Vec<String> = roles
        .iter()
        .filter_map(|role| str_field(role, "UserRoleName"))
        .map(str::to_string)
        .collect();
    if !role_names.is_empty() {
        session.set_roles(&role_names).await?;
    }

    let mut companies: Vec<String> = Vec::new();
    for company in roles.iter().filter_map(|role| str_field(role, "CompanyUUID")) {
        if !companies.iter().any(|c| c == company) {
            companies.push(company.to_string());
        }
    }
    if !companies.is_empty() {
        session.set_allowed_company_uuids(&companies).await?;
    }

    if let Some(cmp) =
        str_field(data, "SelectedCompanyUUID").or_else(|| from_first_role("CompanyUUID"))
    {
        session.set_selected_company_uuid(cmp).await?;
    }
    if let Some(env) =
        str_field(data, "SelectedEnvironmentUUID").or_else(|| from_first_role("EnvironmentUUID"))
    {
        session.set_selected_environment_uuid(env).await?;
    }

    if let Some(profile) = data.get("Profile").filter(|p| p.is_object()) {
        session.set_profile(profile).await?;
    }
    if let Some(name) = str_field(data, "DisplayName") {
        session.set_display_name(name).await?;
    }
    if let Some(rights) = data.get("MenuRights").filter(|r| !r.is_null()) {
        session.set_menu_rights(rights).await?;
    }
    if let Some(designation) = str_field(data, "Designation") {
        session.set_designation(designation).await?;
    }
    if let Some(reporting) = str_field(data, "ReportingDesignation") {
        session.set_reporting_designation(reporting).await?;
    }

    debug!(roles = role_names.len(), companies = companies.len(), "Session persisted");
    Ok(())
}
