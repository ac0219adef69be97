//! # Request Building Blocks
//!
//! Transport-agnostic pieces of an outgoing call: the HTTP method, the body
//! encoding and the caller's per-call arguments. The client crate turns these
//! into real HTTP requests; nothing here performs I/O.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{ContextOverrides, Pagination};

// =============================================================================
// HTTP Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Multipart Form
// =============================================================================

/// A file attached to a multipart form (receipt image, proposal document).
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        FileAttachment {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FileAttachment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

/// Ordered multipart form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: FileAttachment) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File(file),
        });
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
    }

    /// Builds a form from the scalar fields of a JSON object.
    ///
    /// Strings are sent as-is, other scalars via their JSON text, nulls are
    /// skipped and nested values are sent as JSON strings.
    pub fn from_json_fields(fields: &Map<String, Value>) -> Self {
        let mut form = FormData::new();
        for (name, value) in fields {
            match value {
                Value::Null => {}
                Value::String(s) => form.push_text(name.clone(), s.clone()),
                other => form.push_text(name.clone(), other.to_string()),
            }
        }
        form
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Returns the first text value for `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            FormValue::Text(v) if part.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.parts
            .iter()
            .any(|part| part.name == name && matches!(part.value, FormValue::File(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

// =============================================================================
// Request Body
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    None,
    Json(Value),
    Multipart(FormData),
}

impl RequestBody {
    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            RequestBody::Multipart(f) => Some(f),
            _ => None,
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::Multipart(form)
    }
}

// =============================================================================
// Call Arguments
// =============================================================================

/// Everything a caller can supply for one endpoint call.
///
/// ## Example
/// ```rust
/// use meridian_core::request::CallArgs;
/// use meridian_core::types::Pagination;
///
/// let args = CallArgs::new()
///     .target("line-123")
///     .page(Pagination::new(0, 25, "acme"));
/// assert_eq!(args.target.as_deref(), Some("line-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub context: ContextOverrides,
    /// The record the call acts on (header or line UUID).
    pub target: Option<String>,
    /// The owning record when listing/adding lines (header UUID).
    pub parent: Option<String>,
    pub page: Option<Pagination>,
    /// Extra query pairs appended after the descriptor-driven ones.
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn maybe_target(mut self, target: Option<String>) -> Self {
        self.target = target;
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn maybe_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    pub fn page(mut self, page: Pagination) -> Self {
        self.page = Some(page);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, form: FormData) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }
}
