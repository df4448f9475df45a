//! Gen-PDF API request and response types

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page margin preset understood by the Gen-PDF API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageMargin {
    Small,
    Medium,
    #[default]
    Large,
}

/// Body of `POST /mcp/generate-pdf`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfRequest {
    /// Markdown source
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    pub page_margin: PageMargin,
    pub cover: bool,
    pub toc: bool,
    pub enable_page_numbering: bool,
}

impl PdfRequest {
    /// Request with the upstream defaults for every formatting option
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            title: None,
            subtitle: None,
            authors: None,
            page_margin: PageMargin::default(),
            cover: false,
            toc: false,
            enable_page_numbering: true,
        }
    }
}

/// Successful upstream answer: a hosted download link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfResponse {
    pub url: String,
}

impl PdfResponse {
    /// Pull the download link out of a 2xx body.
    ///
    /// Anything that is not a JSON object with a usable `url` yields `None`:
    /// non-JSON text, bare strings, `null`, blank urls, `0` and `false`.
    /// Other non-empty scalar urls are kept as text.
    pub(crate) fn from_body(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let url = match value.get("url")? {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
            serde_json::Value::Bool(true) => "true".to_string(),
            _ => return None,
        };
        (!url.is_empty()).then_some(PdfResponse { url })
    }
}

/// Bearer credential for the Gen-PDF API.
///
/// Has no `Display` impl and a redacted `Debug`, so it cannot leak into logs
/// through formatting.
#[derive(Clone, Default)]
pub struct ApiKey(Option<String>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(key))
        }
    }

    /// No credential configured; requests go out with an empty bearer value
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn bearer_token(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl From<Option<String>> for ApiKey {
    fn from(value: Option<String>) -> Self {
        value.map(ApiKey::new).unwrap_or_default()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("ApiKey([REDACTED])"),
            None => f.write_str("ApiKey(None)"),
        }
    }
}

/// Per-call correlation id, used only to group log lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// `<tool>-<unix millis>-<5 char random suffix>`
    pub fn generate(tool: &str) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}-{}", tool, millis, &suffix[..5]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_serialization_defaults() {
        let request = PdfRequest::new("# Hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "document": "# Hello",
                "pageMargin": "large",
                "cover": false,
                "toc": false,
                "enablePageNumbering": true
            })
        );
    }

    #[test]
    fn test_request_serialization_full() {
        let request = PdfRequest {
            title: Some("Report".to_string()),
            subtitle: Some("Q3".to_string()),
            authors: Some(vec!["Ada".to_string(), "Grace".to_string()]),
            page_margin: PageMargin::Small,
            cover: true,
            toc: true,
            enable_page_numbering: false,
            ..PdfRequest::new("body")
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "document": "body",
                "title": "Report",
                "subtitle": "Q3",
                "authors": ["Ada", "Grace"],
                "pageMargin": "small",
                "cover": true,
                "toc": true,
                "enablePageNumbering": false
            })
        );
    }

    #[test]
    fn test_page_margin_rejects_unknown_value() {
        assert_eq!(
            serde_json::from_str::<PageMargin>(r#""medium""#).unwrap(),
            PageMargin::Medium
        );
        assert!(serde_json::from_str::<PageMargin>(r#""2cm""#).is_err());
    }

    #[test]
    fn test_response_url_handling() {
        assert_eq!(
            PdfResponse::from_body(br#"{"url": "https://x/y.pdf"}"#),
            Some(PdfResponse {
                url: "https://x/y.pdf".to_string()
            })
        );
        assert_eq!(PdfResponse::from_body(br#"{"id": 3}"#), None);
        assert_eq!(PdfResponse::from_body(br#"{"url": "  "}"#), None);
        assert_eq!(PdfResponse::from_body(br#"{"url": null}"#), None);
        assert_eq!(PdfResponse::from_body(b"null"), None);
        assert_eq!(PdfResponse::from_body(b""), None);
    }

    #[test]
    fn test_response_non_object_body_has_no_url() {
        assert_eq!(PdfResponse::from_body(b"<html>oops</html>"), None);
        assert_eq!(PdfResponse::from_body(br#""just text""#), None);
        assert_eq!(PdfResponse::from_body(br#"["https://x/y.pdf"]"#), None);
    }

    #[test]
    fn test_response_scalar_url() {
        assert_eq!(
            PdfResponse::from_body(br#"{"url": 42}"#),
            Some(PdfResponse {
                url: "42".to_string()
            })
        );
        assert_eq!(PdfResponse::from_body(br#"{"url": 0}"#), None);
        assert_eq!(PdfResponse::from_body(br#"{"url": false}"#), None);
        assert_eq!(PdfResponse::from_body(br#"{"url": {"href": "x"}}"#), None);
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret-token");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("super-secret-token"));
        assert_eq!(debug, "ApiKey([REDACTED])");
        assert_eq!(format!("{:?}", ApiKey::none()), "ApiKey(None)");
    }

    #[test]
    fn test_api_key_blank_is_unconfigured() {
        assert!(!ApiKey::new("   ").is_configured());
        assert!(!ApiKey::from(None).is_configured());
        assert_eq!(ApiKey::none().bearer_token(), "");
        assert_eq!(ApiKey::new("abc").bearer_token(), "abc");
    }

    #[test]
    fn test_request_id_format() {
        let id = RequestId::generate("generate_pdf");
        let parts: Vec<&str> = id.as_str().rsplitn(3, '-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 5);
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2], "generate_pdf");
        assert_ne!(id, RequestId::generate("generate_pdf"));
    }
}
