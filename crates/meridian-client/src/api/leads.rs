//! # Leads Facade
//!
//! Business-development pipeline: leads, their status, follow-ups and
//! proposals. The BD controllers read lower-case context keys
//! (`cmpuuid`, `envuuid`, `useruuid`).

use serde_json::{json, Value};

use meridian_core::validation::{require_identifier, validate_date};
use meridian_core::{
    CallArgs, ContextOverrides, Endpoint, FileAttachment, FormData, LeadStatusUpdate, Pagination,
    LEGACY_ACTION_DUE_DATE,
};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Form field a proposal document is uploaded under.
pub const PROPOSAL_FILE_FIELD: &str = "File";

pub struct LeadsApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> LeadsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        LeadsApi {
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
    // Leads
    // =========================================================================

    pub async fn list(&self, page: Pagination) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::LeadList, self.args().page(page))
            .await
    }

    pub async fn details(&self, lead_uuid: &str) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::LeadDetails, self.args().target(lead_uuid))
            .await
    }

    pub async fn add(&self, lead: Value) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::AddLead, self.args().json(lead))
            .await
    }

    pub async fn update(&self, lead_uuid: &str, lead: Value) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::UpdateLead, self.args().target(lead_uuid).json(lead))
            .await
    }

    /// Moves a lead to `update.status`.
    ///
    /// `NextAction` defaults to `""` and `ActionDueDate` to
    /// [`LEGACY_ACTION_DUE_DATE`]; a supplied due date must be `YYYY-MM-DD`.
    pub async fn update_status(&self, update: &LeadStatusUpdate) -> ClientResult<Value> {
        let status = require_identifier("status", Some(update.status.as_str()))?;
        let due_date = match update.action_due_date.as_deref() {
            Some(date) => validate_date("actionDueDate", date)?
                .format("%Y-%m-%d")
                .to_string(),
            None => LEGACY_ACTION_DUE_DATE.to_string(),
        };

        let body = json!({
            "Status": status,
            "NextAction": update.next_action.clone().unwrap_or_default(),
            "ActionDueDate": due_date,
        });
        let args = self.args().target(update.lead_uuid.clone()).json(body);
        self.client.execute(Endpoint::UpdateLeadStatus, args).await
    }

    pub async fn delete(&self, lead_uuid: &str) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::DeleteLead, self.args().target(lead_uuid))
            .await
    }

    pub async fn sources(&self) -> ClientResult<Value> {
        self.client.execute(Endpoint::LeadSources, self.args()).await
    }

    pub async fn statuses(&self) -> ClientResult<Value> {
        self.client.execute(Endpoint::LeadStatuses, self.args()).await
    }

    // =========================================================================
    // Follow-ups & Proposals
    // =========================================================================

    pub async fn follow_ups(&self, lead_uuid: &str) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::LeadFollowUps, self.args().parent(lead_uuid))
            .await
    }

    pub async fn add_follow_up(&self, lead_uuid: &str, follow_up: Value) -> ClientResult<Value> {
        let args = self.args().parent(lead_uuid).json(follow_up);
        self.client.execute(Endpoint::AddLeadFollowUp, args).await
    }

    pub async fn proposals(&self, lead_uuid: &str) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::LeadProposals, self.args().parent(lead_uuid))
            .await
    }

    /// Uploads a proposal: `fields` as form text, `document` as a file.
    pub async fn add_proposal(
        &self,
        lead_uuid: &str,
        fields: &Value,
        document: Option<FileAttachment>,
    ) -> ClientResult<Value> {
        let fields = fields.as_object().ok_or_else(|| {
            ClientError::Serialization("proposal fields must be a JSON object".into())
        })?;
        let mut form = FormData::from_json_fields(fields);
        if let Some(file) = document {
            form = form.file(PROPOSAL_FILE_FIELD, file);
        }

        let args = self.args().parent(lead_uuid).form(form);
        self.client.execute(Endpoint::AddLeadProposal, args).await
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
    async fn test_update_status_wire_shape() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client
            .leads()
            .update_status(&LeadStatusUpdate::new("l1", "won"))
            .await
            .unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        let mut keys = request.query_keys();
        keys.sort_unstable();
        assert_eq!(keys, vec!["cmpuuid", "envuuid", "useruuid", "uuid"]);
        assert_eq!(request.query_value("uuid"), Some("l1"));
        assert_eq!(
            request.body.as_json(),
            Some(&json!({"Status": "won", "NextAction": "", "ActionDueDate": "2025-09-30"}))
        );
    }

    #[tokio::test]
    async fn test_update_status_uses_supplied_follow_up() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        let mut update = LeadStatusUpdate::new("l1", "negotiation");
        update.next_action = Some("Send revised quote".into());
        update.action_due_date = Some("2026-01-15".into());

        client.leads().update_status(&update).await.unwrap();
        let body = transport.last_request().await.unwrap().body;
        assert_eq!(body.as_json().unwrap()["NextAction"], "Send revised quote");
        assert_eq!(body.as_json().unwrap()["ActionDueDate"], "2026-01-15");
    }

    #[tokio::test]
    async fn test_update_status_rejects_bad_date() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        let mut update = LeadStatusUpdate::new("l1", "won");
        update.action_due_date = Some("next week".into());

        let err = client.leads().update_status(&update).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_lowercase_context_and_both_paging() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client.leads().list(Pagination::default()).await.unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(
            request.query_keys(),
            vec![
                "cmpuuid",
                "envuuid",
                "useruuid",
                "start",
                "length",
                "searchValue",
                "Start",
                "Length",
                "SearchValue"
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_lead_aliases() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client.leads().delete("l5").await.unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        for alias in ["uuid", "UUID", "LeadUUID"] {
            assert_eq!(request.query_value(alias), Some("l5"));
        }
    }

    #[tokio::test]
    async fn test_add_proposal_multipart() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client
            .leads()
            .add_proposal(
                "l1",
                &json!({"Title": "Q3 rollout", "Amount": 12000}),
                Some(FileAttachment::new("q3.pdf", "application/pdf", b"%PDF-".to_vec())),
            )
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("LeadUUID"), Some("l1"));
        assert_eq!(request.query_value("leaduuid"), Some("l1"));
        let form = request.body.as_form().unwrap();
        assert_eq!(form.text_value("Title"), Some("Q3 rollout"));
        assert!(form.has_file(PROPOSAL_FILE_FIELD));
    }

    #[tokio::test]
    async fn test_follow_ups_need_lead() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        let err = client.leads().follow_ups("").await.unwrap_err();
        assert_eq!(err.to_string(), "leadUuid is required");
        assert_eq!(transport.request_count().await, 0);
    }
}
