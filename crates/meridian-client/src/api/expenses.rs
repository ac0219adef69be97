//! Expense facade: claims (header/line documents whose lines carry receipt
//! images) and the category lookup.

use serde_json::Value;

use meridian_core::{CallArgs, ContextOverrides, DocumentKind, Endpoint, FileAttachment, FormData};

use crate::api::DocumentsApi;
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Form field a receipt image is uploaded under.
pub const RECEIPT_FIELD: &str = "Receipt";

pub struct ExpensesApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

fn line_form(fields: &Value, receipt: Option<FileAttachment>) -> ClientResult<FormData> {
    let fields = fields.as_object().ok_or_else(|| {
        ClientError::Serialization("expense line fields must be a JSON object".into())
    })?;
    let form = FormData::from_json_fields(fields);
    Ok(match receipt {
        Some(file) => form.file(RECEIPT_FIELD, file),
        None => form,
    })
}

impl<'a> ExpensesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        ExpensesApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    /// Claim headers, lines, submit and PDF.
    pub fn claims(&self) -> DocumentsApi<'a> {
        DocumentsApi::new(self.client, DocumentKind::Expense).with_context(self.context.clone())
    }

    pub async fn categories(&self) -> ClientResult<Value> {
        self.client
            .execute(
                Endpoint::ExpenseCategories,
                CallArgs::new().context(self.context.clone()),
            )
            .await
    }

    /// Adds a line with its receipt image as one multipart request.
    pub async fn add_line(
        &self,
        claim_uuid: &str,
        fields: &Value,
        receipt: Option<FileAttachment>,
    ) -> ClientResult<Value> {
        let form = line_form(fields, receipt)?;
        self.claims().add_line(claim_uuid, form).await
    }

    pub async fn update_line(
        &self,
        line_uuid: &str,
        fields: &Value,
        receipt: Option<FileAttachment>,
    ) -> ClientResult<Value> {
        let form = line_form(fields, receipt)?;
        self.claims().update_line(line_uuid, form).await
    }
}
