//! # Device Collaborators
//!
//! Platform services the data layer consults but does not own: the device's
//! network address (attached to audited calls) and the push-notification
//! token (registered after login).

use async_trait::async_trait;

use crate::error::{ClientError, ClientResult};

/// Best-effort network information.
#[async_trait]
pub trait DeviceInfo: Send + Sync {
    /// Current IP address. Callers treat failure as "omit the field".
    async fn ip_address(&self) -> ClientResult<String>;
}

/// Source of the push-notification token for this install.
#[async_trait]
pub trait PushTokenProvider: Send + Sync {
    /// `Ok(None)` when notifications are disabled or not yet granted.
    async fn device_token(&self) -> ClientResult<Option<String>>;
}

/// Used when no platform integration is wired in.
pub struct NoDeviceInfo;

#[async_trait]
impl DeviceInfo for NoDeviceInfo {
    async fn ip_address(&self) -> ClientResult<String> {
        Err(ClientError::Internal("IP lookup unavailable".into()))
    }
}

pub struct NoPushTokens;

#[async_trait]
impl PushTokenProvider for NoPushTokens {
    async fn device_token(&self) -> ClientResult<Option<String>> {
        Ok(None)
    }
}
