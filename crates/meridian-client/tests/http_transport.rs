//! HTTP round-trips against a local mock backend.

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meridian_client::{
    ApiClient, ApiRequest, ApiSettings, ClientConfig, ClientError, HttpTransport, Transport,
};
use meridian_core::{Credentials, FileAttachment, FormData, HttpMethod, Pagination, RequestBody};
use meridian_store::{MemoryStorage, SessionStore};

fn settings(server: &MockServer) -> ApiSettings {
    ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    }
}

#[tokio::test]
async fn test_sends_query_bearer_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Leave/ApplyLeave"))
        .and(query_param("CMPUUID", "c1"))
        .and(query_param("UserUUID", "u1"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_json(json!({"LeaveTypeUUID": "lt-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Data": {"UUID": "lv-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&settings(&server)).unwrap();
    let mut request = ApiRequest::new(HttpMethod::Post, "/api/Leave/ApplyLeave");
    request.query = vec![
        ("CMPUUID".into(), "c1".into()),
        ("UserUUID".into(), "u1".into()),
    ];
    request.body = RequestBody::Json(json!({"LeaveTypeUUID": "lt-1"}));
    request.bearer = Some("access-1".into());

    let response = transport.send(request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"Data": {"UUID": "lv-1"}}));
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/User/GetProfile"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"Message": "Profile is locked"})),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&settings(&server)).unwrap();
    let err = transport
        .send(ApiRequest::new(HttpMethod::Get, "/api/User/GetProfile"))
        .await
        .unwrap_err();

    match err {
        ClientError::Http { status, body, .. } => {
            assert_eq!(status, 422);
            assert_eq!(body, Some(json!({"Message": "Profile is locked"})));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_error_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&settings(&server)).unwrap();
    let err = transport
        .send(ApiRequest::new(HttpMethod::Delete, "/api/Leave/CancelLeave"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 500, body: None, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_multipart_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/User/UpdateProfileImage"))
        .and(body_string_contains("name=\"ProfileImage\"; filename=\"me.png\""))
        .and(body_string_contains("name=\"Caption\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Data": true})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&settings(&server)).unwrap();
    let mut request = ApiRequest::new(HttpMethod::Post, "/api/User/UpdateProfileImage");
    request.body = RequestBody::Multipart(
        FormData::new()
            .text("Caption", "Holiday")
            .file("ProfileImage", FileAttachment::new("me.png", "image/png", vec![0x89, 0x50])),
    );

    let response = transport.send(request).await.unwrap();
    assert_eq!(response.body, json!({"Data": true}));
}

#[tokio::test]
async fn test_login_then_list_leaves() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/Login"))
        .and(body_json(json!({"UserName": "asha", "Password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": {
                "UUID": "u-9",
                "Token": {"AccessToken": "at-9", "RefreshToken": "rt-9"},
                "Roles": [{"CompanyUUID": "c-9", "EnvironmentUUID": "e-9", "UserRoleName": "Employee"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Leave/GetList"))
        .and(header("authorization", "Bearer at-9"))
        .and(query_param("CMPUUID", "c-9"))
        .and(query_param("ENVUUID", "e-9"))
        .and(query_param("UserUUID", "u-9"))
        .and(query_param("length", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Data": [{"LeaveUUID": "lv-1"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let mut config = ClientConfig::new();
    config.api.base_url = server.uri();
    let client = ApiClient::builder()
        .with_config(config)
        .with_storage(storage.clone())
        .build()
        .unwrap();

    client
        .auth()
        .login(&Credentials::new(" asha ", "pw"))
        .await
        .unwrap();
    client.flush_background().await;

    let session = SessionStore::new(std::sync::Arc::new(storage));
    assert_eq!(session.uuid().await.unwrap().as_deref(), Some("u-9"));

    let leaves = client.hr().leaves(Pagination::default()).await.unwrap();
    assert_eq!(leaves, json!([{"LeaveUUID": "lv-1"}]));
}
