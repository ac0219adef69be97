//! # HTTP Transport
//!
//! The one place bytes leave the device. The dispatcher hands over a fully
//! built [`ApiRequest`]; the transport sends it and reports the status and
//! body it got back.
//!
//! ## Request Flow
//! ```text
//! ┌──────────────┐  ApiRequest   ┌────────────────┐   HTTPS   ┌────────────┐
//! │  ApiClient   │──────────────►│ HttpTransport  │──────────►│ ERP backend│
//! │ (dispatcher) │◄──────────────│   (reqwest)    │◄──────────│            │
//! └──────────────┘  ApiResponse  └────────────────┘           └────────────┘
//!                   or ClientError::Http / Network / Timeout
//! ```
//!
//! Tests swap [`HttpTransport`] for the recording transport in
//! `crate::testing`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use meridian_core::request::FormValue;
use meridian_core::{FormData, HttpMethod, RequestBody};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request / Response
// =============================================================================

/// A request ready to send: path already resolved, query already expanded.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, e.g. `/api/Leave/GetList`.
    pub path: String,
    /// Query pairs in send order. Keys may repeat.
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::None,
            bearer: None,
        }
    }

    /// First value sent under `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Query keys in send order.
    pub fn query_keys(&self) -> Vec<&str> {
        self.query.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A 2xx response. Non-2xx never reaches callers as an `ApiResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    /// Parsed JSON; an empty body is `Null`, non-JSON text is a `String`.
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        ApiResponse {
            status: 200,
            status_text: "OK".to_string(),
            body,
        }
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request`. Non-2xx statuses are returned as
    /// [`ClientError::Http`].
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

// =============================================================================
// reqwest Transport
// =============================================================================

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpTransport { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> ClientResult<Url> {
        // Keep any path prefix on the base URL (e.g. https://host/erp).
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn multipart(form: &FormData) -> ClientResult<Form> {
        let mut multipart = Form::new();
        for part in form.parts() {
            multipart = match &part.value {
                FormValue::Text(text) => multipart.text(part.name.clone(), text.clone()),
                FormValue::File(file) => {
                    let file_part = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.content_type)
                        .map_err(|e| {
                            ClientError::Serialization(format!(
                                "invalid content type '{}': {}",
                                file.content_type, e
                            ))
                        })?;
                    multipart.part(part.name.clone(), file_part)
                }
            };
        }
        Ok(multipart)
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, path = %request.path, "Sending request");

        let mut builder = self
            .client
            .request(Self::method(request.method), url)
            .query(&request.query);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(form) => builder.multipart(Self::multipart(form)?),
        };

        let response = builder.send().await.map_err(|e| {
            error!(path = %request.path, error = %e, "Request failed before a response");
            ClientError::from(e)
        })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let text = response.text().await?;
        let body = parse_body(&text);

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                status_text,
                body: Some(body).filter(|b| !b.is_null()),
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body(r#"{"Data":[1]}"#), json!({"Data": [1]}));
        assert_eq!(parse_body("Saved"), json!("Saved"));
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let settings = ApiSettings {
            base_url: "https://erp.acme.test/mobile/".into(),
            ..ApiSettings::default()
        };
        let transport = HttpTransport::new(&settings).unwrap();
        let url = transport.url_for("/api/Auth/Login").unwrap();
        assert_eq!(url.as_str(), "https://erp.acme.test/mobile/api/Auth/Login");
    }

    #[test]
    fn test_request_debug_redacts_bearer() {
        let mut request = ApiRequest::new(HttpMethod::Get, "/api/User/GetProfile");
        request.bearer = Some("secret-token".into());
        let printed = format!("{:?}", request);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_query_helpers() {
        let mut request = ApiRequest::new(HttpMethod::Delete, "/api/Leave/CancelLeave");
        request.query.push(("uuid".into(), "l1".into()));
        request.query.push(("UUID".into(), "l1".into()));
        assert_eq!(request.query_value("UUID"), Some("l1"));
        assert_eq!(request.query_keys(), vec!["uuid", "UUID"]);
        assert_eq!(request.query_value("LeaveUUID"), None);
    }

    #[test]
    fn test_bad_mime_is_serialization_error() {
        let form = FormData::new().file(
            "Receipt",
            meridian_core::FileAttachment::new("r.jpg", "not a mime", vec![1]),
        );
        assert!(matches!(
            HttpTransport::multipart(&form),
            Err(ClientError::Serialization(_))
        ));
    }
}
