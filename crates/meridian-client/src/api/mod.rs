//! # Domain Facades
//!
//! Typed entry points over [`ApiClient::execute`](crate::ApiClient::execute),
//! one per app area. Each facade only shapes arguments; the endpoint table
//! decides keys, casing and encoding.
//!
//! ```text
//! client.hr().leaves(page)                       ─► Endpoint::LeaveList
//! client.sales().orders().delete_line("l-1")     ─► Document(SalesOrder, DeleteLine)
//! client.leads().with_context(ctx).list(page)    ─► Endpoint::LeadList, explicit ids
//! ```

mod company;
mod documents;
mod expenses;
mod hr;
mod leads;
mod profile;
mod timesheets;

pub use company::CompanyApi;
pub use documents::{DocumentsApi, PurchasesApi, SalesApi};
pub use expenses::{ExpensesApi, RECEIPT_FIELD};
pub use hr::HrApi;
pub use leads::{LeadsApi, PROPOSAL_FILE_FIELD};
pub use profile::{ProfileApi, PROFILE_IMAGE_FIELD};
pub use timesheets::TimesheetsApi;

use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Unwraps the base64 string a `Document` endpoint returns.
pub(crate) fn document_string(value: Value, entity: &str) -> ClientResult<String> {
    match value {
        Value::String(encoded) => Ok(encoded),
        other => Err(ClientError::Internal(format!(
            "{} document came back as {}",
            entity,
            match other {
                Value::Null => "null",
                Value::Array(_) => "an array",
                Value::Object(_) => "an object",
                _ => "a scalar",
            }
        ))),
    }
}
