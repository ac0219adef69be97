//! # Test Doubles
//!
//! In-process stand-ins for the network and the platform, so the request
//! contract (query keys, bodies, ordering) can be asserted without a server.
//!
//! ```rust,ignore
//! let transport = RecordingTransport::new();
//! transport.push_json(json!({ "Data": [] })).await;
//!
//! let client = ApiClient::builder()
//!     .with_storage(logged_in_storage())
//!     .with_transport(transport.clone())
//!     .build()?;
//!
//! client.leads().list(Pagination::default()).await?;
//! assert_eq!(transport.last_request().await.unwrap().path, "/api/BD/Lead/GetList");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use meridian_core::{SessionEvent, StorageKey};
use meridian_store::MemoryStorage;

use crate::device::{DeviceInfo, PushTokenProvider};
use crate::error::{ClientError, ClientResult};
use crate::events::SessionEventEmitter;
use crate::transport::{ApiRequest, ApiResponse, Transport};

// =============================================================================
// Recording Transport
// =============================================================================

#[derive(Default)]
struct Recorded {
    requests: Vec<ApiRequest>,
    responses: VecDeque<ClientResult<ApiResponse>>,
}

/// Records every request and answers from a queue.
///
/// An empty queue answers `200 {}`. Cloning shares the recording.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a 200 response with `body`.
    pub async fn push_json(&self, body: Value) {
        self.push_response(Ok(ApiResponse::ok(body))).await;
    }

    /// Queues a non-2xx response.
    pub async fn push_status(&self, status: u16, status_text: &str, body: Value) {
        self.push_response(Err(ClientError::Http {
            status,
            status_text: status_text.to_string(),
            body: Some(body),
        }))
        .await;
    }

    pub async fn push_error(&self, error: ClientError) {
        self.push_response(Err(error)).await;
    }

    pub async fn push_response(&self, response: ClientResult<ApiResponse>) {
        self.inner.lock().await.responses.push_back(response);
    }

    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().await.requests.clone()
    }

    pub async fn last_request(&self) -> Option<ApiRequest> {
        self.inner.lock().await.requests.last().cloned()
    }

    pub async fn request_count(&self) -> usize {
        self.inner.lock().await.requests.len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let mut inner = self.inner.lock().await;
        inner.requests.push(request);
        inner
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::ok(json!({}))))
    }
}

// =============================================================================
// Platform Doubles
// =============================================================================

/// Always reports the same address.
pub struct FixedDeviceInfo(pub String);

#[async_trait]
impl DeviceInfo for FixedDeviceInfo {
    async fn ip_address(&self) -> ClientResult<String> {
        Ok(self.0.clone())
    }
}

/// Always reports the same push token.
pub struct FixedPushToken(pub Option<String>);

#[async_trait]
impl PushTokenProvider for FixedPushToken {
    async fn device_token(&self) -> ClientResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Collects emitted session events.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    events: Arc<StdMutex<Vec<SessionEvent>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl SessionEventEmitter for RecordingEmitter {
    fn emit(&self, event: &SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Storage holding a logged-in session: company `c1`, environment `e1`,
/// user `u1`, access token `access-1`.
pub fn logged_in_storage() -> MemoryStorage {
    MemoryStorage::with_values([
        (StorageKey::Uuid, "u1"),
        (StorageKey::CmpUuid, "c1"),
        (StorageKey::EnvUuid, "e1"),
        (StorageKey::AccessToken, "access-1"),
        (StorageKey::RefreshToken, "refresh-1"),
    ])
}
