//! # Header/Line Documents
//!
//! Sales orders, sales invoices, purchase orders, purchase invoices,
//! timesheets and expense claims share one shape: a header record owning
//! line records, plus submit and PDF.
//!
//! ```text
//!   Header (headerUuid) ─┬─ Line (lineUuid)
//!                        ├─ Line
//!                        └─ Line
//! ```
//!
//! [`DocumentsApi`] covers every [`DocumentOp`] for one [`DocumentKind`].

use serde_json::Value;

use meridian_core::envelope::decode_document;
use meridian_core::{
    CallArgs, ContextOverrides, DocumentKind, DocumentOp, Endpoint, Pagination, RequestBody,
};

use crate::api::document_string;
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

pub struct DocumentsApi<'a> {
    client: &'a ApiClient,
    kind: DocumentKind,
    context: ContextOverrides,
}

impl<'a> DocumentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient, kind: DocumentKind) -> Self {
        DocumentsApi {
            client,
            kind,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    async fn run(&self, op: DocumentOp, args: CallArgs) -> ClientResult<Value> {
        let args = args.context(self.context.clone());
        self.client
            .execute(Endpoint::Document(self.kind, op), args)
            .await
    }

    // =========================================================================
    // Headers
    // =========================================================================

    pub async fn list(&self, page: Pagination) -> ClientResult<Value> {
        self.run(DocumentOp::List, CallArgs::new().page(page)).await
    }

    pub async fn header(&self, header_uuid: &str) -> ClientResult<Value> {
        self.run(DocumentOp::Header, CallArgs::new().target(header_uuid))
            .await
    }

    pub async fn add_header(&self, header: Value) -> ClientResult<Value> {
        self.run(DocumentOp::AddHeader, CallArgs::new().json(header))
            .await
    }

    pub async fn update_header(&self, header_uuid: &str, header: Value) -> ClientResult<Value> {
        let args = CallArgs::new().target(header_uuid).json(header);
        self.run(DocumentOp::UpdateHeader, args).await
    }

    pub async fn delete_header(&self, header_uuid: &str) -> ClientResult<Value> {
        self.run(DocumentOp::DeleteHeader, CallArgs::new().target(header_uuid))
            .await
    }

    // =========================================================================
    // Lines
    // =========================================================================

    pub async fn lines(&self, header_uuid: &str) -> ClientResult<Value> {
        self.run(DocumentOp::Lines, CallArgs::new().parent(header_uuid))
            .await
    }

    /// Adds a line under `header_uuid`. Takes JSON, or a form for kinds
    /// whose lines carry attachments.
    pub async fn add_line(
        &self,
        header_uuid: &str,
        line: impl Into<RequestBody>,
    ) -> ClientResult<Value> {
        let args = CallArgs::new().parent(header_uuid).body(line);
        self.run(DocumentOp::AddLine, args).await
    }

    pub async fn update_line(
        &self,
        line_uuid: &str,
        line: impl Into<RequestBody>,
    ) -> ClientResult<Value> {
        let args = CallArgs::new().target(line_uuid).body(line);
        self.run(DocumentOp::UpdateLine, args).await
    }

    pub async fn delete_line(&self, line_uuid: &str) -> ClientResult<Value> {
        self.run(DocumentOp::DeleteLine, CallArgs::new().target(line_uuid))
            .await
    }

    // =========================================================================
    // Workflow & Print
    // =========================================================================

    pub async fn submit(&self, header_uuid: &str) -> ClientResult<Value> {
        self.run(DocumentOp::Submit, CallArgs::new().target(header_uuid))
            .await
    }

    /// Base64 PDF of the document.
    pub async fn pdf(&self, header_uuid: &str) -> ClientResult<String> {
        let value = self
            .run(DocumentOp::Pdf, CallArgs::new().target(header_uuid))
            .await?;
        document_string(value, self.kind.entity())
    }

    pub async fn pdf_bytes(&self, header_uuid: &str) -> ClientResult<Vec<u8>> {
        let encoded = self.pdf(header_uuid).await?;
        decode_document(&encoded, self.kind.entity())
            .map_err(|e| ClientError::from(e).into_user_facing())
    }
}

// =============================================================================
// Sales / Purchases
// =============================================================================

pub struct SalesApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> SalesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        SalesApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    pub fn orders(&self) -> DocumentsApi<'a> {
        DocumentsApi::new(self.client, DocumentKind::SalesOrder).with_context(self.context.clone())
    }

    pub fn invoices(&self) -> DocumentsApi<'a> {
        DocumentsApi::new(self.client, DocumentKind::SalesInvoice)
            .with_context(self.context.clone())
    }
}

pub struct PurchasesApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> PurchasesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        PurchasesApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    pub fn orders(&self) -> DocumentsApi<'a> {
        DocumentsApi::new(self.client, DocumentKind::PurchaseOrder)
            .with_context(self.context.clone())
    }

    pub fn invoices(&self) -> DocumentsApi<'a> {
        DocumentsApi::new(self.client, DocumentKind::PurchaseInvoice)
            .with_context(self.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{logged_in_storage, RecordingTransport};
    use meridian_core::HttpMethod;
    use meridian_store::MemoryStorage;
    use serde_json::json;

    fn client(transport: &RecordingTransport) -> ApiClient {
        ApiClient::builder()
            .with_storage(logged_in_storage())
            .with_transport(transport.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_line_without_uuid_sends_nothing() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        let err = client.purchases().orders().delete_line("").await.unwrap_err();
        assert_eq!(err.to_string(), "lineUuid is required");
        assert!(matches!(err, ClientError::MissingIdentifier { .. }));
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_line_sends_every_alias() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client.purchases().orders().delete_line("pl-9").await.unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/api/PurchaseOrder/DeleteLine");
        for alias in ["uuid", "UUID", "LineUUID"] {
            assert_eq!(request.query_value(alias), Some("pl-9"));
        }
        assert_eq!(request.query_value("CMPUUID"), Some("c1"));
    }

    #[tokio::test]
    async fn test_every_delete_op_carries_aliases() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        for kind in DocumentKind::ALL {
            let api = client.documents(kind);
            api.delete_header("h-1").await.unwrap();
            let header = transport.last_request().await.unwrap();
            assert_eq!(header.query_value("HeaderUUID"), Some("h-1"), "{:?}", kind);
            assert_eq!(header.query_value("uuid"), Some("h-1"));

            api.delete_line("l-1").await.unwrap();
            let line = transport.last_request().await.unwrap();
            assert_eq!(line.query_value("LineUUID"), Some("l-1"), "{:?}", kind);
            assert_eq!(line.query_value("UUID"), Some("l-1"));
        }
    }

    #[tokio::test]
    async fn test_sales_list_pagination_both_casings() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        transport
            .push_json(json!({"Data": {"Rows": [], "Total": 0}}))
            .await;

        let page = client
            .sales()
            .invoices()
            .list(Pagination::new(10, 5, " acme "))
            .await
            .unwrap();
        assert_eq!(page, json!({"Rows": [], "Total": 0}));

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.path, "/api/SalesInvoice/GetList");
        assert_eq!(request.query_value("Start"), Some("10"));
        assert_eq!(request.query_value("length"), Some("5"));
        assert_eq!(request.query_value("SearchValue"), Some(" acme "));
    }

    #[tokio::test]
    async fn test_lines_use_parent_aliases() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        client
            .sales()
            .orders()
            .add_line("so-1", json!({"ItemUUID": "i1", "Qty": 2}))
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("HeaderUUID"), Some("so-1"));
        assert_eq!(request.query_value("headerUuid"), Some("so-1"));
        assert_eq!(request.query_value("uuid"), None);
        assert_eq!(request.body.as_json().unwrap()["Qty"], 2);
    }

    #[tokio::test]
    async fn test_pdf_lookup_across_keys() {
        let transport = RecordingTransport::new();
        let client = client(&transport);
        let bodies = [
            json!({"Data": {"pdfBase64": "AAA="}}),
            json!({"Data": {"SlipBase64": "AAA="}}),
            json!({"data": {"pdfBase64": "AAA="}}),
            json!({"base64": "AAA="}),
        ];
        for body in bodies {
            transport.push_json(body).await;
            let pdf = client.sales().orders().pdf("so-1").await.unwrap();
            assert_eq!(pdf, "AAA=");
        }

        transport.push_json(json!({"Data": {}})).await;
        let err = client.purchases().invoices().pdf("pi-1").await.unwrap_err();
        assert_eq!(err.to_string(), "Purchase invoice PDF not found in response");
    }

    #[tokio::test]
    async fn test_context_override_flows_to_documents() {
        let transport = RecordingTransport::new();
        let client = ApiClient::builder()
            .with_storage(MemoryStorage::new())
            .with_transport(transport.clone())
            .build()
            .unwrap();
        let context = ContextOverrides::none()
            .with_cmp_uuid("c2")
            .with_env_uuid("e2")
            .with_user_uuid("u2");

        client
            .sales()
            .with_context(context)
            .orders()
            .submit("so-3")
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("ENVUUID"), Some("e2"));
        assert_eq!(request.path, "/api/SalesOrder/Submit");
        assert!(request.bearer.is_none());
    }
}
