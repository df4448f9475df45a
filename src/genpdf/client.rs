//! HTTP client for the Gen-PDF API

use crate::error::{Error, Result};
use crate::genpdf::types::{ApiKey, PdfRequest, PdfResponse, RequestId};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

/// Public Gen-PDF proxy
pub const DEFAULT_BASE_URL: &str = "https://proxy.gen-pdf.com";

/// Relative path of the generation endpoint
pub const GENERATE_PDF_PATH: &str = "mcp/generate-pdf";

/// Upper bound on one generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Gen-PDF generation endpoint.
///
/// Holds only immutable settings. Every call builds its own `reqwest::Client`,
/// so concurrent calls share nothing.
#[derive(Debug, Clone)]
pub struct GenPdfClient {
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl GenPdfClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn has_api_key(&self) -> bool {
        self.api_key.is_configured()
    }

    /// Full URL of the generation endpoint, keeping any path prefix of the base URL
    pub fn endpoint(&self) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(GENERATE_PDF_PATH)?)
    }

    /// Submit one generation request. Makes exactly one HTTP call, no retries.
    pub async fn generate(
        &self,
        request: &PdfRequest,
        request_id: &RequestId,
    ) -> Result<PdfResponse> {
        let endpoint = self.endpoint()?;
        let body = serde_json::to_vec(request)?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::HttpRequest)?;

        tracing::debug!(
            %request_id,
            endpoint = %endpoint,
            body_bytes = body.len(),
            "Sending request to Gen-PDF API for PDF generation"
        );

        let response = client
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(self.api_key.bearer_token())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%request_id, status = status.as_u16(), "Received response from Gen-PDF API");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::from_status(
                status.as_u16(),
                status.canonical_reason(),
                &text,
            ));
        }

        let bytes = response.bytes().await?;

        PdfResponse::from_body(&bytes).ok_or_else(|| {
            tracing::warn!(%request_id, "Gen-PDF response did not contain a url");
            Error::MissingUrl
        })
    }
}

impl Default for GenPdfClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, ApiKey::none(), DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://proxy.gen-pdf.com", "https://proxy.gen-pdf.com/mcp/generate-pdf")]
    #[case("https://proxy.gen-pdf.com/", "https://proxy.gen-pdf.com/mcp/generate-pdf")]
    #[case("http://127.0.0.1:8080/api", "http://127.0.0.1:8080/api/mcp/generate-pdf")]
    fn test_endpoint(#[case] base: &str, #[case] expected: &str) {
        let client = GenPdfClient::new(base, ApiKey::none(), DEFAULT_TIMEOUT);
        assert_eq!(client.endpoint().unwrap().as_str(), expected);
    }

    #[test]
    fn test_endpoint_invalid_base() {
        let client = GenPdfClient::new("not a url", ApiKey::none(), DEFAULT_TIMEOUT);
        assert!(matches!(client.endpoint(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_default_client() {
        let client = GenPdfClient::default();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), Duration::from_millis(30_000));
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = GenPdfClient::new(DEFAULT_BASE_URL, ApiKey::new("sk-live-123"), DEFAULT_TIMEOUT);
        assert!(!format!("{:?}", client).contains("sk-live-123"));
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_reported_not_raised() {
        let client = GenPdfClient::new("::::", ApiKey::none(), DEFAULT_TIMEOUT);
        let request = PdfRequest::new("# doc");
        let err = client
            .generate(&request, &RequestId::generate("generate_pdf"))
            .await
            .unwrap_err();
        assert!(err.client_message().starts_with("PDF generation error: "));
    }
}
