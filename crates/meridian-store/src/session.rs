//! # Session Store
//!
//! Typed accessors over [`DeviceStorage`]. Everything the data layer persists
//! at login and reads back when resolving tenant context goes through here.
//!
//! Blank stored values read back as `None`, so a cleared-by-empty-string key
//! behaves like a missing one.

use std::sync::Arc;

use meridian_core::{StorageKey, TokenPair};
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::storage::DeviceStorage;

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn DeviceStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DeviceStorage>) -> Self {
        SessionStore { storage }
    }

    pub fn storage(&self) -> &Arc<dyn DeviceStorage> {
        &self.storage
    }

    // =========================================================================
    // Raw access
    // =========================================================================

    async fn read(&self, key: StorageKey) -> StoreResult<Option<String>> {
        let value = self.storage.get(key).await?;
        Ok(value.filter(|v| !v.trim().is_empty()))
    }

    async fn write(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        self.storage.set(key, value).await
    }

    async fn read_json(&self, key: StorageKey) -> StoreResult<Option<Value>> {
        match self.read(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::invalid_value(key.as_str(), e.to_string())),
            None => Ok(None),
        }
    }

    async fn write_json(&self, key: StorageKey, value: &Value) -> StoreResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StoreError::invalid_value(key.as_str(), e.to_string()))?;
        self.write(key, &raw).await
    }

    async fn read_string_list(&self, key: StorageKey) -> StoreResult<Vec<String>> {
        let list = match self.read_json(key).await? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(_) => {
                return Err(StoreError::invalid_value(key.as_str(), "expected a JSON array"))
            }
            None => Vec::new(),
        };
        Ok(list)
    }

    async fn write_string_list(&self, key: StorageKey, values: &[String]) -> StoreResult<()> {
        let array = Value::Array(values.iter().cloned().map(Value::String).collect());
        self.write_json(key, &array).await
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    pub async fn uuid(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::Uuid).await
    }

    pub async fn cmp_uuid(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::CmpUuid).await
    }

    pub async fn env_uuid(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::EnvUuid).await
    }

    pub async fn role_uuid(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::RoleUuid).await
    }

    pub async fn selected_company_uuid(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::SelectedCompanyUuid).await
    }

    pub async fn selected_environment_uuid(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::SelectedEnvironmentUuid).await
    }

    pub async fn set_uuid(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::Uuid, value).await
    }

    pub async fn set_cmp_uuid(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::CmpUuid, value).await
    }

    pub async fn set_env_uuid(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::EnvUuid, value).await
    }

    pub async fn set_role_uuid(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::RoleUuid, value).await
    }

    pub async fn set_selected_company_uuid(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::SelectedCompanyUuid, value).await
    }

    pub async fn set_selected_environment_uuid(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::SelectedEnvironmentUuid, value).await
    }

    pub async fn allowed_company_uuids(&self) -> StoreResult<Vec<String>> {
        self.read_string_list(StorageKey::AllowedCompanyUuids).await
    }

    pub async fn set_allowed_company_uuids(&self, values: &[String]) -> StoreResult<()> {
        self.write_string_list(StorageKey::AllowedCompanyUuids, values)
            .await
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    pub async fn access_token(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::AccessToken).await
    }

    pub async fn refresh_token(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::RefreshToken).await
    }

    /// Both tokens, if both are stored.
    pub async fn tokens(&self) -> StoreResult<Option<TokenPair>> {
        let (access, refresh) = tokio::join!(self.access_token(), self.refresh_token());
        Ok(match (access?, refresh?) {
            (Some(access_token), Some(refresh_token)) => Some(TokenPair {
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    pub async fn set_tokens(&self, tokens: &TokenPair) -> StoreResult<()> {
        debug!("Persisting token pair");
        self.write(StorageKey::AccessToken, &tokens.access_token)
            .await?;
        self.write(StorageKey::RefreshToken, &tokens.refresh_token)
            .await
    }

    pub async fn clear_tokens(&self) -> StoreResult<()> {
        debug!("Clearing token pair");
        self.storage.remove(StorageKey::AccessToken).await?;
        self.storage.remove(StorageKey::RefreshToken).await
    }

    // =========================================================================
    // Profile & Roles
    // =========================================================================

    pub async fn profile(&self) -> StoreResult<Option<Value>> {
        self.read_json(StorageKey::Profile).await
    }

    pub async fn set_profile(&self, profile: &Value) -> StoreResult<()> {
        self.write_json(StorageKey::Profile, profile).await
    }

    pub async fn display_name(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::DisplayName).await
    }

    pub async fn set_display_name(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::DisplayName, value).await
    }

    /// Role names, e.g. `["Admin"]`.
    pub async fn roles(&self) -> StoreResult<Vec<String>> {
        self.read_string_list(StorageKey::Roles).await
    }

    pub async fn set_roles(&self, roles: &[String]) -> StoreResult<()> {
        self.write_string_list(StorageKey::Roles, roles).await
    }

    pub async fn menu_rights(&self) -> StoreResult<Option<Value>> {
        self.read_json(StorageKey::MenuRights).await
    }

    pub async fn set_menu_rights(&self, rights: &Value) -> StoreResult<()> {
        self.write_json(StorageKey::MenuRights, rights).await
    }

    pub async fn designation(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::Designation).await
    }

    pub async fn set_designation(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::Designation, value).await
    }

    pub async fn reporting_designation(&self) -> StoreResult<Option<String>> {
        self.read(StorageKey::ReportingDesignation).await
    }

    pub async fn set_reporting_designation(&self, value: &str) -> StoreResult<()> {
        self.write(StorageKey::ReportingDesignation, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn session() -> (SessionStore, MemoryStorage) {
        let memory = MemoryStorage::new();
        (SessionStore::new(Arc::new(memory.clone())), memory)
    }

    #[tokio::test]
    async fn test_blank_values_read_as_none() {
        let (session, memory) = session();
        memory.set(StorageKey::CmpUuid, "  ").await.unwrap();
        assert_eq!(session.cmp_uuid().await.unwrap(), None);

        session.set_cmp_uuid("c1").await.unwrap();
        assert_eq!(session.cmp_uuid().await.unwrap().as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_tokens_roundtrip_and_clear() {
        let (session, memory) = session();
        assert!(session.tokens().await.unwrap().is_none());

        let pair = TokenPair {
            access_token: "a".into(),
            refresh_token: "r".into(),
        };
        session.set_tokens(&pair).await.unwrap();
        assert_eq!(session.tokens().await.unwrap(), Some(pair));

        session.set_uuid("u1").await.unwrap();
        session.clear_tokens().await.unwrap();
        assert!(session.access_token().await.unwrap().is_none());
        assert!(session.refresh_token().await.unwrap().is_none());
        // Identifiers survive a token clear.
        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn test_roles_stored_as_json_array() {
        let (session, memory) = session();
        session.set_roles(&["Admin".to_string()]).await.unwrap();

        assert_eq!(
            memory.get(StorageKey::Roles).await.unwrap().as_deref(),
            Some(r#"["Admin"]"#)
        );
        assert_eq!(session.roles().await.unwrap(), vec!["Admin".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_json() {
        let (session, _) = session();
        let profile = json!({"FirstName": "Ada", "Email": "ada@example.com"});
        session.set_profile(&profile).await.unwrap();
        assert_eq!(session.profile().await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_corrupt_list_is_an_error() {
        let (session, memory) = session();
        memory
            .set(StorageKey::AllowedCompanyUuids, "{\"a\":1}")
            .await
            .unwrap();
        assert!(matches!(
            session.allowed_company_uuids().await,
            Err(StoreError::InvalidValue { .. })
        ));
    }
}
