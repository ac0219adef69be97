//! # API Client
//!
//! One dispatcher for every backend operation. Call sites name an
//! [`Endpoint`] and pass [`CallArgs`]; the descriptor decides the rest.
//!
//! ## Dispatch Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ApiClient::execute(endpoint, args)                 │
//! │                                                                         │
//! │  1. spec = endpoint.spec()                                              │
//! │  2. target / parent present?          ── no ──► MissingIdentifier       │
//! │  3. ContextResolver (storage reads)   ── missing ──► MissingIdentifier  │
//! │  4. query: context keys (per casing)                                    │
//! │            target + parent (every alias)                                │
//! │            pagination (per style)                                       │
//! │            caller extras                                                │
//! │  5. body:  JSON / multipart (+ IPAddress when audited)                  │
//! │  6. bearer token (authenticated endpoints)                              │
//! │  7. Transport::send                    ── error ──► logged, propagated  │
//! │  8. normalize: Envelope │ Raw │ Document (base64 string)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Background Tasks
//! Device-token registration and removal are fire-and-forget. They run on
//! the tokio runtime, log their own failures, and can be awaited with
//! [`ApiClient::flush_background`].

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use meridian_core::endpoint::{BodyEncoding, IdParam, PaginationStyle, ResponseKind};
use meridian_core::envelope::{find_document_base64, is_empty_payload, unwrap_envelope};
use meridian_core::validation::require_identifier;
use meridian_core::{
    CallArgs, DocumentKind, Endpoint, EndpointSpec, FormData, PathTable, RequestBody,
    SessionEvent,
};
use meridian_store::{DeviceStorage, SessionStore};

use crate::api::{
    CompanyApi, DocumentsApi, ExpensesApi, HrApi, LeadsApi, ProfileApi, PurchasesApi, SalesApi,
    TimesheetsApi,
};
use crate::auth::AuthApi;
use crate::config::{ClientConfig, DeviceSettings};
use crate::context::{ContextResolver, ResolvedContext};
use crate::device::{DeviceInfo, NoDeviceInfo, NoPushTokens, PushTokenProvider};
use crate::error::{ClientError, ClientResult};
use crate::events::{NoOpEmitter, SessionEventEmitter};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Form/body field carrying the device address on audited calls.
pub const AUDIT_IP_FIELD: &str = "IPAddress";

// =============================================================================
// API Client
// =============================================================================

/// Cheap to clone; clones share the transport, storage and task list.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    resolver: ContextResolver,
    paths: PathTable,
    device_info: Arc<dyn DeviceInfo>,
    push_tokens: Arc<dyn PushTokenProvider>,
    emitter: Arc<dyn SessionEventEmitter>,
    device: DeviceSettings,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("path_overrides", &self.inner.paths.len())
            .field("device", &self.inner.device)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn paths(&self) -> &PathTable {
        &self.inner.paths
    }

    pub fn device_settings(&self) -> &DeviceSettings {
        &self.inner.device
    }

    pub(crate) fn push_tokens(&self) -> &Arc<dyn PushTokenProvider> {
        &self.inner.push_tokens
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.inner.emitter.emit(&event);
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Runs one endpoint call and returns the normalized payload.
    ///
    /// `Document` endpoints return the base64 document as a JSON string.
    pub async fn execute(&self, endpoint: Endpoint, args: CallArgs) -> ClientResult<Value> {
        let spec = endpoint.spec();
        let request = self.build_request(&spec, args).await?;
        let response = self.send_request(&spec, request).await;

        match spec.response {
            ResponseKind::Envelope => Ok(unwrap_envelope(response?.body)),
            ResponseKind::Raw => Ok(response?.body),
            ResponseKind::Document => response
                .and_then(|r| {
                    find_document_base64(&r.body, &spec.entity).map_err(ClientError::from)
                })
                .map(Value::String)
                .map_err(ClientError::into_user_facing),
        }
    }

    /// Tries each candidate query shape against `endpoint` until one returns
    /// a non-empty payload.
    ///
    /// Candidate failures are logged and skipped; precondition failures end
    /// the lookup at once. Returns the last empty payload if every answer
    /// was empty, and fails only when every candidate failed.
    pub async fn execute_first_non_empty(
        &self,
        endpoint: Endpoint,
        base: CallArgs,
        candidates: Vec<Vec<(String, String)>>,
    ) -> ClientResult<Value> {
        if candidates.is_empty() {
            return self.execute(endpoint, base).await;
        }

        let attempts = candidates.len();
        let mut last_empty: Option<Value> = None;
        let mut last_error: Option<ClientError> = None;

        for (index, shape) in candidates.into_iter().enumerate() {
            let mut args = base.clone();
            args.query.extend(shape);

            match self.execute(endpoint, args).await {
                Ok(payload) if !is_empty_payload(&payload) => return Ok(payload),
                Ok(payload) => {
                    debug!(endpoint = ?endpoint, candidate = index, "Lookup candidate returned nothing");
                    last_empty = Some(payload);
                }
                Err(e) if e.is_precondition() => return Err(e),
                Err(e) => {
                    warn!(endpoint = ?endpoint, candidate = index, error = %e, "Lookup candidate failed");
                    last_error = Some(e);
                }
            }
        }

        match (last_empty, last_error) {
            (Some(payload), _) => Ok(payload),
            (None, Some(e)) => Err(ClientError::AllCandidatesFailed {
                endpoint: endpoint.spec().key.into_owned(),
                attempts,
                last_error: e.to_string(),
            }),
            (None, None) => Ok(Value::Null),
        }
    }

    /// Builds the wire request for `spec`, failing before any I/O on
    /// missing identifiers.
    pub(crate) async fn build_request(
        &self,
        spec: &EndpointSpec,
        args: CallArgs,
    ) -> ClientResult<ApiRequest> {
        let CallArgs {
            context,
            target,
            parent,
            page,
            query: extra,
            body,
        } = args;

        let target = required_id(spec.target, target.as_deref())?;
        let parent = required_id(spec.parent, parent.as_deref())?;
        let resolved = self
            .inner
            .resolver
            .resolve(spec.context.requires, &context)
            .await?;

        let mut query = Vec::new();
        push_context(&mut query, spec, &resolved);
        for (id, value) in target.iter().chain(parent.iter()) {
            for alias in id.aliases {
                query.push((alias.to_string(), value.clone()));
            }
        }
        if spec.pagination != PaginationStyle::None {
            let page = page.unwrap_or_default();
            for (start, length, search_key) in spec.pagination.key_sets() {
                query.push((start.to_string(), page.start.to_string()));
                query.push((length.to_string(), page.length.to_string()));
                query.push((search_key.to_string(), page.search_value.clone()));
            }
        }
        query.extend(extra);

        let body = self.build_body(spec, body).await?;
        let bearer = if spec.authenticated {
            self.inner.session.access_token().await?
        } else {
            None
        };
        let path = self.inner.paths.resolve(spec).to_string();

        debug!(endpoint = %spec.key, path = %path, params = query.len(), "Built request");

        Ok(ApiRequest {
            method: spec.method,
            path,
            query,
            body,
            bearer,
        })
    }

    async fn build_body(&self, spec: &EndpointSpec, body: RequestBody) -> ClientResult<RequestBody> {
        let body = match (spec.body, body) {
            (BodyEncoding::Json, RequestBody::None) => RequestBody::Json(json!({})),
            (BodyEncoding::Multipart, RequestBody::None) => RequestBody::Multipart(FormData::new()),
            (BodyEncoding::Multipart, RequestBody::Json(Value::Object(fields))) => {
                RequestBody::Multipart(FormData::from_json_fields(&fields))
            }
            (BodyEncoding::Multipart, RequestBody::Json(_)) => {
                return Err(ClientError::Serialization(format!(
                    "{} expects form fields, got a non-object JSON body",
                    spec.key
                )))
            }
            (_, body) => body,
        };

        if !spec.audit_ip {
            return Ok(body);
        }

        match self.inner.device_info.ip_address().await {
            Ok(ip) => Ok(with_audit_ip(body, ip)),
            Err(e) => {
                warn!(endpoint = %spec.key, error = %e, "IP lookup failed, sending without IPAddress");
                Ok(body)
            }
        }
    }

    pub(crate) async fn send_request(
        &self,
        spec: &EndpointSpec,
        request: ApiRequest,
    ) -> ClientResult<ApiResponse> {
        let path = request.path.clone();
        match self.inner.transport.send(request).await {
            Ok(response) => {
                debug!(endpoint = %spec.key, status = response.status, "Request succeeded");
                Ok(response)
            }
            Err(e) => {
                error!(
                    endpoint = %spec.key,
                    path = %path,
                    status = ?e.status(),
                    error = %e,
                    "Request failed"
                );
                Err(e)
            }
        }
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Runs `task` detached. Failures are logged, never returned.
    pub(crate) fn spawn_background<F>(&self, label: &'static str, task: F)
    where
        F: Future<Output = ClientResult<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            match task.await {
                Ok(()) => debug!(task = label, "Background task finished"),
                Err(e) => warn!(task = label, error = %e, "Background task failed"),
            }
        });

        match self.inner.background.lock() {
            Ok(mut handles) => {
                handles.retain(|h| !h.is_finished());
                handles.push(handle);
            }
            Err(_) => warn!(task = label, "Background task list poisoned; task left untracked"),
        }
    }

    /// Waits for every background task started so far.
    pub async fn flush_background(&self) {
        let handles = match self.inner.background.lock() {
            Ok(mut handles) => std::mem::take(&mut *handles),
            Err(_) => return,
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Background task panicked");
            }
        }
    }

    // =========================================================================
    // Domain Facades
    // =========================================================================

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn profile(&self) -> ProfileApi<'_> {
        ProfileApi::new(self)
    }

    pub fn company(&self) -> CompanyApi<'_> {
        CompanyApi::new(self)
    }

    pub fn hr(&self) -> HrApi<'_> {
        HrApi::new(self)
    }

    pub fn documents(&self, kind: DocumentKind) -> DocumentsApi<'_> {
        DocumentsApi::new(self, kind)
    }

    pub fn sales(&self) -> SalesApi<'_> {
        SalesApi::new(self)
    }

    pub fn purchases(&self) -> PurchasesApi<'_> {
        PurchasesApi::new(self)
    }

    pub fn timesheets(&self) -> TimesheetsApi<'_> {
        TimesheetsApi::new(self)
    }

    pub fn expenses(&self) -> ExpensesApi<'_> {
        ExpensesApi::new(self)
    }

    pub fn leads(&self) -> LeadsApi<'_> {
        LeadsApi::new(self)
    }
}

fn required_id(param: Option<IdParam>, value: Option<&str>) -> ClientResult<Option<(IdParam, String)>> {
    match param {
        Some(id) => Ok(Some((id, require_identifier(id.field, value)?))),
        None => Ok(None),
    }
}

fn push_context(query: &mut Vec<(String, String)>, spec: &EndpointSpec, resolved: &ResolvedContext) {
    let casing = spec.context.casing;
    let groups = [
        (casing.cmp_keys(), &resolved.cmp_uuid),
        (casing.env_keys(), &resolved.env_uuid),
        (casing.user_keys(), &resolved.user_uuid),
    ];
    for (keys, value) in groups {
        if let Some(value) = value {
            for key in keys {
                query.push((key.to_string(), value.clone()));
            }
        }
    }
}

fn with_audit_ip(body: RequestBody, ip: String) -> RequestBody {
    match body {
        RequestBody::Json(Value::Object(mut fields)) => {
            fields
                .entry(AUDIT_IP_FIELD)
                .or_insert_with(|| Value::String(ip));
            RequestBody::Json(Value::Object(fields))
        }
        RequestBody::Multipart(mut form) => {
            if form.text_value(AUDIT_IP_FIELD).is_none() {
                form.push_text(AUDIT_IP_FIELD, ip);
            }
            RequestBody::Multipart(form)
        }
        other => other,
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ApiClient`]. Device storage is required; everything else
/// has a default.
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    storage: Option<Arc<dyn DeviceStorage>>,
    transport: Option<Arc<dyn Transport>>,
    paths: Option<PathTable>,
    device_info: Option<Arc<dyn DeviceInfo>>,
    push_tokens: Option<Arc<dyn PushTokenProvider>>,
    emitter: Option<Arc<dyn SessionEventEmitter>>,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL, timeouts, device identity and path overrides.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_storage(mut self, storage: impl DeviceStorage + 'static) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Replaces the reqwest transport (tests, custom stacks).
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replaces the path table derived from the config.
    pub fn with_paths(mut self, paths: PathTable) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_device_info(mut self, device_info: impl DeviceInfo + 'static) -> Self {
        self.device_info = Some(Arc::new(device_info));
        self
    }

    pub fn with_push_tokens(mut self, push_tokens: impl PushTokenProvider + 'static) -> Self {
        self.push_tokens = Some(Arc::new(push_tokens));
        self
    }

    pub fn with_emitter(mut self, emitter: impl SessionEventEmitter + 'static) -> Self {
        self.emitter = Some(Arc::new(emitter));
        self
    }

    pub fn build(self) -> ClientResult<ApiClient> {
        let storage = self
            .storage
            .ok_or_else(|| ClientError::InvalidConfig("Device storage required".into()))?;
        let config = self.config.unwrap_or_default();

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                config.validate()?;
                Arc::new(HttpTransport::new(&config.api)?)
            }
        };
        let paths = self.paths.unwrap_or_else(|| config.path_table());
        let session = SessionStore::new(storage);

        debug!(overrides = paths.len(), "Building API client");

        Ok(ApiClient {
            inner: Arc::new(Inner {
                transport,
                resolver: ContextResolver::new(session.clone()),
                session,
                paths,
                device_info: self.device_info.unwrap_or_else(|| Arc::new(NoDeviceInfo)),
                push_tokens: self.push_tokens.unwrap_or_else(|| Arc::new(NoPushTokens)),
                emitter: self.emitter.unwrap_or_else(|| Arc::new(NoOpEmitter)),
                device: config.device,
                background: Mutex::new(Vec::new()),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{logged_in_storage, FixedDeviceInfo, RecordingTransport};
    use meridian_core::{DocumentOp, FileAttachment, HttpMethod, Pagination};
    use meridian_store::MemoryStorage;

    fn client(storage: MemoryStorage, transport: &RecordingTransport) -> ApiClient {
        ApiClient::builder()
            .with_storage(storage)
            .with_transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_storage() {
        let err = ApiClient::builder().build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_missing_context_fails_before_transport() {
        let transport = RecordingTransport::new();
        let client = client(MemoryStorage::new(), &transport);

        for endpoint in Endpoint::all() {
            let spec = endpoint.spec();
            if spec.context.requires.is_empty() {
                continue;
            }
            let args = CallArgs::new().target("t1").parent("p1");
            let err = client.execute(endpoint, args).await.unwrap_err();
            assert!(err.is_precondition(), "{} gave {:?}", spec.key, err);
        }
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_upper_context_keys_and_bearer() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        client
            .execute(Endpoint::LeaveBalance, CallArgs::new())
            .await
            .unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/Leave/GetLeaveBalance");
        assert_eq!(request.query_keys(), vec!["CMPUUID", "ENVUUID", "UserUUID"]);
        assert_eq!(request.query_value("UserUUID"), Some("u1"));
        assert_eq!(request.bearer.as_deref(), Some("access-1"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_both_casings_for_self_service_documents() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        client
            .execute(
                Endpoint::Document(DocumentKind::Timesheet, DocumentOp::Header),
                CallArgs::new().target("ts-1"),
            )
            .await
            .unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(
            request.query_keys(),
            vec![
                "cmpuuid", "CMPUUID", "envuuid", "ENVUUID", "useruuid", "UserUUID", "uuid",
                "UUID", "HeaderUUID"
            ]
        );
    }

    #[tokio::test]
    async fn test_pagination_keys_exact() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        client
            .execute(
                Endpoint::LeaveList,
                CallArgs::new().page(Pagination::new(20, 10, "sick")),
            )
            .await
            .unwrap();
        let lower = transport.last_request().await.unwrap();
        let paging: Vec<&str> = lower.query_keys().into_iter().skip(3).collect();
        assert_eq!(paging, vec!["start", "length", "searchValue"]);
        assert_eq!(lower.query_value("start"), Some("20"));
        assert_eq!(lower.query_value("searchValue"), Some("sick"));

        client
            .execute(Endpoint::CustomerList, CallArgs::new())
            .await
            .unwrap();
        let both = transport.last_request().await.unwrap();
        let paging: Vec<&str> = both.query_keys().into_iter().skip(2).collect();
        assert_eq!(
            paging,
            vec!["start", "length", "searchValue", "Start", "Length", "SearchValue"]
        );
        assert_eq!(both.query_value("Length"), Some("10"));
        assert_eq!(both.query_value("SearchValue"), Some(""));
    }

    #[tokio::test]
    async fn test_search_value_sent_as_given() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        client
            .execute(
                Endpoint::LeaveList,
                CallArgs::new().page(Pagination::new(0, 10, " acme ")),
            )
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("searchValue"), Some(" acme "));

        let long = "x".repeat(201);
        client
            .execute(
                Endpoint::LeaveList,
                CallArgs::new().page(Pagination::new(0, 10, long.clone())),
            )
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("searchValue"), Some(long.as_str()));
        assert_eq!(transport.request_count().await, 2);
    }

    #[tokio::test]
    async fn test_envelope_normalization() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        transport.push_json(json!({"Data": [{"UUID": "h1"}], "Message": "ok"})).await;
        transport.push_json(json!({"data": {"Total": 3}})).await;
        transport.push_json(json!([1, 2])).await;

        let first = client.execute(Endpoint::HolidayList, CallArgs::new()).await.unwrap();
        let second = client.execute(Endpoint::HolidayList, CallArgs::new()).await.unwrap();
        let third = client.execute(Endpoint::HolidayList, CallArgs::new()).await.unwrap();

        assert_eq!(first, json!([{"UUID": "h1"}]));
        assert_eq!(second, json!({"Total": 3}));
        assert_eq!(third, json!([1, 2]));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);
        transport
            .push_status(500, "Internal Server Error", json!({"Message": "db down"}))
            .await;

        let err = client
            .execute(Endpoint::LeaveTypes, CallArgs::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "db down");
    }

    #[tokio::test]
    async fn test_audit_ip_attached_when_available() {
        let transport = RecordingTransport::new();
        let client = ApiClient::builder()
            .with_storage(logged_in_storage())
            .with_transport(transport.clone())
            .with_device_info(FixedDeviceInfo("10.0.0.7".into()))
            .build()
            .unwrap();

        client
            .execute(Endpoint::CheckIn, CallArgs::new().json(json!({"Latitude": 1.5})))
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(
            request.body.as_json(),
            Some(&json!({"Latitude": 1.5, "IPAddress": "10.0.0.7"}))
        );
    }

    #[tokio::test]
    async fn test_audit_ip_omitted_when_lookup_fails() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        client
            .execute(Endpoint::CheckOut, CallArgs::new())
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.body.as_json(), Some(&json!({})));
    }

    #[tokio::test]
    async fn test_multipart_from_json_fields() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        let form = FormData::new()
            .text("Amount", "12.50")
            .file("Receipt", FileAttachment::new("r.jpg", "image/jpeg", vec![1, 2]));
        client
            .execute(
                Endpoint::Document(DocumentKind::Expense, DocumentOp::AddLine),
                CallArgs::new().parent("ex-1").form(form),
            )
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        let sent = request.body.as_form().unwrap();
        assert!(sent.has_file("Receipt"));
        assert_eq!(request.query_value("HeaderUUID"), Some("ex-1"));

        client
            .execute(
                Endpoint::UpdateProfileImage,
                CallArgs::new().json(json!({"Caption": "me"})),
            )
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.body.as_form().unwrap().text_value("Caption"), Some("me"));
    }

    #[tokio::test]
    async fn test_path_overrides_apply() {
        let transport = RecordingTransport::new();
        let client = ApiClient::builder()
            .with_storage(logged_in_storage())
            .with_transport(transport.clone())
            .with_paths(PathTable::with_overrides([("LEAVE_TYPES", "/api/v2/Leave/Types")]))
            .build()
            .unwrap();

        client.execute(Endpoint::LeaveTypes, CallArgs::new()).await.unwrap();
        assert_eq!(
            transport.last_request().await.unwrap().path,
            "/api/v2/Leave/Types"
        );
    }

    #[tokio::test]
    async fn test_first_non_empty_stops_at_first_hit() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);
        transport.push_error(ClientError::Timeout).await;
        transport.push_json(json!({"Data": []})).await;
        transport.push_json(json!({"Data": [{"TaskName": "Design"}]})).await;

        let payload = client
            .execute_first_non_empty(
                Endpoint::ProjectTasks,
                CallArgs::new(),
                vec![
                    vec![("ProjectUUID".into(), "p1".into())],
                    vec![("projectUuid".into(), "p1".into())],
                    vec![("ProjectId".into(), "p1".into())],
                    vec![("never".into(), "sent".into())],
                ],
            )
            .await
            .unwrap();

        assert_eq!(payload, json!([{"TaskName": "Design"}]));
        assert_eq!(transport.request_count().await, 3);
    }

    #[tokio::test]
    async fn test_first_non_empty_returns_last_empty() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);
        transport.push_json(json!({"Data": []})).await;
        transport.push_error(ClientError::Network("reset".into())).await;

        let payload = client
            .execute_first_non_empty(
                Endpoint::ProjectTasks,
                CallArgs::new(),
                vec![vec![("a".into(), "1".into())], vec![("b".into(), "1".into())]],
            )
            .await
            .unwrap();
        assert_eq!(payload, json!([]));
    }

    #[tokio::test]
    async fn test_first_non_empty_all_failed() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);
        transport.push_error(ClientError::Timeout).await;
        transport.push_error(ClientError::Timeout).await;

        let err = client
            .execute_first_non_empty(
                Endpoint::ProjectTasks,
                CallArgs::new(),
                vec![vec![("a".into(), "1".into())], vec![("b".into(), "1".into())]],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::AllCandidatesFailed { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn test_background_tasks_flush() {
        let transport = RecordingTransport::new();
        let client = client(logged_in_storage(), &transport);

        let worker = client.clone();
        client.spawn_background("flush-check", async move {
            worker.execute(Endpoint::HolidayList, CallArgs::new()).await?;
            Ok(())
        });
        client.spawn_background("failing", async { Err(ClientError::Timeout) });
        client.flush_background().await;

        assert_eq!(transport.request_count().await, 1);
    }
}
