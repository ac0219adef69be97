//! # Response Envelope Handling
//!
//! The backend wraps most payloads as `{ Data: ... }`, some as `{ data: ... }`
//! and a few not at all. Everything that reads a response goes through here.
//!
//! ## Normalization Priority
//! ```text
//! ┌───────────────────────────────┬──────────────────────────────────────┐
//! │ Response body                 │ unwrap_envelope() returns            │
//! ├───────────────────────────────┼──────────────────────────────────────┤
//! │ { "Data": X, ... }            │ X                                    │
//! │ { "data": X, ... }            │ X                                    │
//! │ [ ... ] / scalar / other obj  │ the body itself                      │
//! └───────────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! ## Error Message Priority
//! `Message` → `message` → `error` → `errors[0]` → `statusText` →
//! network/timeout heuristics → [`FALLBACK_ERROR_MESSAGE`].

use base64::Engine;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const TIMEOUT_ERROR_MESSAGE: &str = "Request timed out. Please try again.";
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Keys a base64 document has been seen under, in lookup order.
pub const DOCUMENT_KEYS: [&str; 6] = [
    "pdfBase64",
    "PdfBase64",
    "SlipBase64",
    "slipBase64",
    "Base64",
    "base64",
];

// =============================================================================
// Envelope
// =============================================================================

/// Returns `Data`, else `data`, else the body untouched.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            if let Some(data) = map.remove("Data").filter(|v| !v.is_null()) {
                return data;
            }
            if let Some(data) = map.remove("data").filter(|v| !v.is_null()) {
                return data;
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// True for null, `""`, `[]` and `{}`.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Locates a base64 document in a slip/PDF response.
///
/// Looks under `Data`, then `data`, then the root object. A container that
/// is itself a non-empty string is taken as the document.
pub fn find_document_base64(body: &Value, entity: &str) -> CoreResult<String> {
    let containers = [body.get("Data"), body.get("data"), Some(body)];

    for container in containers.into_iter().flatten() {
        match container {
            Value::String(s) if !s.trim().is_empty() => return Ok(s.clone()),
            Value::Object(map) => {
                let found = DOCUMENT_KEYS
                    .iter()
                    .filter_map(|key| map.get(*key))
                    .find_map(|v| v.as_str().filter(|s| !s.trim().is_empty()));
                if let Some(doc) = found {
                    return Ok(doc.to_string());
                }
            }
            _ => {}
        }
    }

    Err(CoreError::DocumentNotFound {
        entity: entity.to_string(),
    })
}

/// Decodes a base64 document, tolerating a `data:...;base64,` prefix.
pub fn decode_document(encoded: &str, entity: &str) -> CoreResult<Vec<u8>> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| CoreError::InvalidDocument {
            entity: entity.to_string(),
            reason: e.to_string(),
        })
}

// =============================================================================
// Error Messages
// =============================================================================

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_error(body: &Value) -> Option<String> {
    let first = body.get("errors")?.as_array()?.first()?;
    match first {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => non_empty_str(first.get("message"))
            .or_else(|| non_empty_str(first.get("Message"))),
        _ => None,
    }
}

/// Picks the message to show the user for a failed call.
///
/// `body` is the response body if one arrived, `status_text` the HTTP reason
/// phrase, and `error_text` the rendered transport error.
pub fn extract_error_message(
    body: Option<&Value>,
    status_text: Option<&str>,
    error_text: &str,
) -> String {
    if let Some(body) = body {
        let from_body = non_empty_str(body.get("Message"))
            .or_else(|| non_empty_str(body.get("message")))
            .or_else(|| non_empty_str(body.get("error")))
            .or_else(|| first_error(body));
        if let Some(message) = from_body {
            return message;
        }
    }

    if let Some(status_text) = status_text.map(str::trim).filter(|s| !s.is_empty()) {
        return status_text.to_string();
    }

    let lowered = error_text.to_lowercase();
    if lowered.contains("network") {
        NETWORK_ERROR_MESSAGE.to_string()
    } else if lowered.contains("timeout") || lowered.contains("timed out") {
        TIMEOUT_ERROR_MESSAGE.to_string()
    } else {
        FALLBACK_ERROR_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_prefers_upper_data() {
        let body = json!({"Data": [1], "data": [2]});
        assert_eq!(unwrap_envelope(body), json!([1]));

        let body = json!({"data": {"x": 1}, "Message": "ok"});
        assert_eq!(unwrap_envelope(body), json!({"x": 1}));
    }

    #[test]
    fn test_unwrap_falls_back_to_raw() {
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            unwrap_envelope(json!({"Items": [], "Data": null})),
            json!({"Items": []})
        );
    }

    #[test]
    fn test_empty_payloads() {
        assert!(is_empty_payload(&json!(null)));
        assert!(is_empty_payload(&json!([])));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!("  ")));
        assert!(!is_empty_payload(&json!([{}])));
        assert!(!is_empty_payload(&json!(0)));
    }

    #[test]
    fn test_document_lookup_order() {
        let body = json!({"Data": {"pdfBase64": "AAA"}});
        assert_eq!(find_document_base64(&body, "Invoice").unwrap(), "AAA");

        let body = json!({"Data": {"SlipBase64": "BBB"}});
        assert_eq!(find_document_base64(&body, "Payslip").unwrap(), "BBB");

        let body = json!({"data": {"pdfBase64": "CCC"}});
        assert_eq!(find_document_base64(&body, "Invoice").unwrap(), "CCC");

        let body = json!({"base64": "DDD"});
        assert_eq!(find_document_base64(&body, "Invoice").unwrap(), "DDD");

        let body = json!({"Data": "EEE"});
        assert_eq!(find_document_base64(&body, "Invoice").unwrap(), "EEE");
    }

    #[test]
    fn test_document_not_found() {
        let body = json!({"Data": {"pdfBase64": ""}, "Message": "none"});
        let err = find_document_base64(&body, "Sales invoice").unwrap_err();
        assert_eq!(err.to_string(), "Sales invoice PDF not found in response");
    }

    #[test]
    fn test_decode_document() {
        assert_eq!(decode_document("aGVsbG8=", "Payslip").unwrap(), b"hello");
        assert_eq!(
            decode_document("data:application/pdf;base64,aGVs\nbG8=", "Payslip").unwrap(),
            b"hello"
        );
        assert!(matches!(
            decode_document("***", "Payslip"),
            Err(CoreError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_error_message_priority() {
        let body = json!({"Message": "A", "message": "B", "error": "C"});
        assert_eq!(extract_error_message(Some(&body), Some("Bad Request"), ""), "A");

        let body = json!({"message": "B", "error": "C"});
        assert_eq!(extract_error_message(Some(&body), None, ""), "B");

        let body = json!({"error": "C", "errors": ["D"]});
        assert_eq!(extract_error_message(Some(&body), None, ""), "C");

        let body = json!({"errors": [{"message": "D"}]});
        assert_eq!(extract_error_message(Some(&body), None, ""), "D");

        let body = json!({"errors": []});
        assert_eq!(
            extract_error_message(Some(&body), Some("Not Found"), ""),
            "Not Found"
        );
    }

    #[test]
    fn test_error_message_heuristics() {
        assert_eq!(
            extract_error_message(None, None, "Network request failed"),
            NETWORK_ERROR_MESSAGE
        );
        assert_eq!(
            extract_error_message(None, None, "operation timed out"),
            TIMEOUT_ERROR_MESSAGE
        );
        assert_eq!(
            extract_error_message(None, None, "boom"),
            FALLBACK_ERROR_MESSAGE
        );
    }
}
