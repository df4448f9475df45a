//! Error types for the Gen-PDF MCP Server

use thiserror::Error;

/// Result type alias for the Gen-PDF MCP Server
pub type Result<T> = std::result::Result<T, Error>;

/// Longest upstream error text carried into a client message
const MAX_UPSTREAM_MESSAGE_CHARS: usize = 500;

/// Error types for the Gen-PDF MCP Server
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream accepted the request but returned no download link
    #[error("Upstream response did not contain a url")]
    MissingUrl,

    /// Upstream rejected the bearer credential (HTTP 401)
    #[error("Upstream rejected the API key (401)")]
    Unauthorized,

    /// Upstream rate limit hit (HTTP 429)
    #[error("Upstream rate limit exceeded (429)")]
    RateLimited,

    /// Upstream internal error (HTTP 500)
    #[error("Upstream internal server error (500)")]
    UpstreamServer,

    /// Any other non-success status
    #[error("Upstream returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Base URL could not be turned into an endpoint
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request error (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Classify a non-success upstream status together with its body text.
    pub fn from_status(status: u16, reason: Option<&str>, body: &str) -> Self {
        match status {
            401 => Error::Unauthorized,
            429 => Error::RateLimited,
            500 => Error::UpstreamServer,
            _ => Error::UpstreamStatus {
                status,
                message: upstream_message(body)
                    .or_else(|| reason.map(str::to_string))
                    .unwrap_or_else(|| "Unknown error".to_string()),
            },
        }
    }

    /// Return the message shown to the MCP client.
    /// Never includes the credential.
    pub fn client_message(&self) -> String {
        match self {
            Error::MissingUrl => "PDF generation failed: Unknown error".to_string(),
            Error::Unauthorized => "Authentication failed. Please check your GEN_PDF_API_KEY is valid and properly configured.".to_string(),
            Error::RateLimited => {
                "Rate limit exceeded. Please try again in a few moments.".to_string()
            }
            Error::UpstreamServer => {
                "Internal server error. Please try again or contact support if the issue persists."
                    .to_string()
            }
            Error::UpstreamStatus { status, message } => {
                format!("PDF generation failed ({}): {}", status, message)
            }
            Error::InvalidUrl(e) => format!("PDF generation error: invalid upstream URL: {}", e),
            Error::HttpRequest(e) => format!("PDF generation error: {}", error_chain(e)),
            Error::Serialization(e) => format!("PDF generation error: {}", e),
        }
    }
}

/// Pull a human-readable message out of an upstream error body.
/// Prefers the JSON `message` field, then `error`, then the raw text.
fn upstream_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let field = ["message", "error"].iter().find_map(|key| {
            value
                .get(*key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
        });
        if let Some(message) = field {
            return Some(truncate(message));
        }
    }

    Some(truncate(body))
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_UPSTREAM_MESSAGE_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_UPSTREAM_MESSAGE_CHARS).collect();
        format!("{}...", cut)
    }
}

/// reqwest hides the interesting part (e.g. "operation timed out") in the source chain
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
