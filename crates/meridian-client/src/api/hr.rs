//! # HR Facade
//!
//! Attendance, holidays, leave requests and approvals, payslips.
//!
//! ## Leave Lifecycle
//! ```text
//!   apply_leave ──► pending ──┬── approve_leave (HR admin) ──► approved
//!                             ├── reject_leave  (HR admin) ──► rejected
//!                             └── cancel_leave  (employee) ──► cancelled
//! ```

use serde_json::{json, Value};

use meridian_core::envelope::decode_document;
use meridian_core::validation::{validate_date, validate_month};
use meridian_core::{CallArgs, ContextOverrides, Endpoint, Pagination};

use crate::api::document_string;
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

pub struct HrApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> HrApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        HrApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    fn args(&self) -> CallArgs {
        CallArgs::new().context(self.context.clone())
    }

    // =========================================================================
    // Attendance
    // =========================================================================

    /// `details` carries location and notes; `IPAddress` is added when known.
    pub async fn check_in(&self, details: Value) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::CheckIn, self.args().json(details))
            .await
    }

    pub async fn check_out(&self, details: Value) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::CheckOut, self.args().json(details))
            .await
    }

    pub async fn attendance_history(&self, page: Pagination) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::AttendanceHistory, self.args().page(page))
            .await
    }

    /// Totals between two `YYYY-MM-DD` dates, inclusive.
    pub async fn attendance_summary(&self, from: &str, to: &str) -> ClientResult<Value> {
        let from_date = validate_date("fromDate", from)?;
        let to_date = validate_date("toDate", to)?;
        if to_date < from_date {
            return Err(ClientError::InvalidInput(
                meridian_core::ValidationError::InvalidFormat {
                    field: "toDate".into(),
                    reason: "must not be before fromDate".into(),
                },
            ));
        }

        let args = self
            .args()
            .query("FromDate", from_date.format("%Y-%m-%d").to_string())
            .query("ToDate", to_date.format("%Y-%m-%d").to_string());
        self.client.execute(Endpoint::AttendanceSummary, args).await
    }

    pub async fn holidays(&self, year: i32) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::HolidayList, self.args().query("Year", year.to_string()))
            .await
    }

    // =========================================================================
    // Leave
    // =========================================================================

    pub async fn leave_types(&self) -> ClientResult<Value> {
        self.client.execute(Endpoint::LeaveTypes, self.args()).await
    }

    pub async fn leave_balance(&self) -> ClientResult<Value> {
        self.client.execute(Endpoint::LeaveBalance, self.args()).await
    }

    /// Submits a leave request as given.
    pub async fn apply_leave(&self, request: Value) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::ApplyLeave, self.args().json(request))
            .await
    }

    /// The user's own leave requests.
    pub async fn leaves(&self, page: Pagination) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::LeaveList, self.args().page(page))
            .await
    }

    pub async fn cancel_leave(&self, leave_uuid: &str) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::CancelLeave, self.args().target(leave_uuid))
            .await
    }

    /// Requests awaiting the HR admin's decision.
    pub async fn approval_queue(&self, page: Pagination) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::ApproveLeaveList, self.args().page(page))
            .await
    }

    pub async fn approve_leave(&self, leave_uuid: &str, remarks: Option<&str>) -> ClientResult<Value> {
        self.decide(Endpoint::ApproveLeave, leave_uuid, remarks).await
    }

    pub async fn reject_leave(&self, leave_uuid: &str, remarks: Option<&str>) -> ClientResult<Value> {
        self.decide(Endpoint::RejectLeave, leave_uuid, remarks).await
    }

    async fn decide(
        &self,
        endpoint: Endpoint,
        leave_uuid: &str,
        remarks: Option<&str>,
    ) -> ClientResult<Value> {
        let body = json!({ "Remarks": remarks.unwrap_or_default() });
        self.client
            .execute(endpoint, self.args().target(leave_uuid).json(body))
            .await
    }

    // =========================================================================
    // Payroll
    // =========================================================================

    /// Base64 payslip PDF for the given month.
    pub async fn payslip_pdf(&self, month: u32, year: i32) -> ClientResult<String> {
        validate_month(month)?;
        let args = self
            .args()
            .query("Month", month.to_string())
            .query("Year", year.to_string());
        let value = self.client.execute(Endpoint::PayslipPdf, args).await?;
        document_string(value, "Payslip")
    }

    pub async fn payslip_pdf_bytes(&self, month: u32, year: i32) -> ClientResult<Vec<u8>> {
        let encoded = self.payslip_pdf(month, year).await?;
        decode_document(&encoded, "Payslip").map_err(|e| ClientError::from(e).into_user_facing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{logged_in_storage, RecordingTransport};
    use meridian_core::HttpMethod;

    fn client(transport: &RecordingTransport) -> ApiClient {
        ApiClient::builder()
            .with_storage(logged_in_storage())
            .with_transport(transport.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_cancel_leave_sends_every_alias() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client.hr().cancel_leave("lv-1").await.unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        for alias in ["uuid", "UUID", "LeaveUUID"] {
            assert_eq!(request.query_value(alias), Some("lv-1"), "alias {}", alias);
        }
    }

    #[tokio::test]
    async fn test_payslip_found_under_nested_key() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        transport
            .push_json(json!({"data": {"SlipBase64": "JVBERi0="}}))
            .await;

        let slip = client.hr().payslip_pdf(3, 2025).await.unwrap();
        assert_eq!(slip, "JVBERi0=");
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("Month"), Some("3"));
        assert_eq!(request.query_value("Year"), Some("2025"));
    }

    #[tokio::test]
    async fn test_payslip_missing_is_user_facing() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        transport.push_json(json!({"Data": {"Url": null}})).await;

        let err = client.hr().payslip_pdf(3, 2025).await.unwrap_err();
        assert!(matches!(err, ClientError::UserFacing(_)));
        assert_eq!(err.to_string(), "Payslip PDF not found in response");
    }

    #[tokio::test]
    async fn test_payslip_http_error_uses_backend_message() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        transport
            .push_status(404, "Not Found", json!({"message": "Payslip not generated yet"}))
            .await;

        let err = client.hr().payslip_pdf(3, 2025).await.unwrap_err();
        assert_eq!(err.to_string(), "Payslip not generated yet");
    }

    #[tokio::test]
    async fn test_payslip_bytes_decoded() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        transport
            .push_json(json!({"Data": {"pdfBase64": "data:application/pdf;base64,JVBERi0="}}))
            .await;

        let bytes = client.hr().payslip_pdf_bytes(1, 2024).await.unwrap();
        assert_eq!(bytes, b"%PDF-".to_vec());
    }

    #[tokio::test]
    async fn test_invalid_period_rejected_before_io() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        assert!(client.hr().payslip_pdf(13, 2025).await.is_err());
        assert!(client.hr().payslip_pdf(0, 2025).await.is_err());
        assert!(client
            .hr()
            .attendance_summary("2025-02-10", "2025-02-01")
            .await
            .is_err());
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_leave_and_holiday_inputs_forwarded() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        let request = json!({
            "LeaveTypeUUID": "lt-1",
            "FromDate": "2025-02-10T00:00:00",
            "ToDate": "2025-02-12T00:00:00"
        });

        client.hr().apply_leave(request.clone()).await.unwrap();
        let sent = transport.last_request().await.unwrap();
        assert_eq!(sent.body.as_json(), Some(&request));

        client.hr().holidays(1999).await.unwrap();
        let sent = transport.last_request().await.unwrap();
        assert_eq!(sent.query_value("Year"), Some("1999"));

        transport
            .push_json(json!({"Data": {"pdfBase64": "JVBERi0="}}))
            .await;
        client.hr().payslip_pdf(12, 2101).await.unwrap();
        let sent = transport.last_request().await.unwrap();
        assert_eq!(sent.query_value("Year"), Some("2101"));
    }

    #[tokio::test]
    async fn test_approve_leave_carries_remarks() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client
            .hr()
            .approve_leave("lv-2", Some("Enjoy"))
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/api/Leave/ApproveLeave");
        assert_eq!(request.query_value("LeaveUUID"), Some("lv-2"));
        assert_eq!(request.body.as_json(), Some(&json!({"Remarks": "Enjoy"})));
    }

    #[tokio::test]
    async fn test_approval_queue_resolves_user_from_storage() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client
            .hr()
            .approval_queue(Pagination::default())
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/api/Leave/GetHRAApproveLeaves");
        assert_eq!(request.query_value("UserUUID"), Some("u1"));
    }
}
