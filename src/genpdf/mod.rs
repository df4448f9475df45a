//! Gen-PDF API adapter
//!
//! Typed request/response model and the HTTP client that forwards a markdown
//! document to the Gen-PDF service.

mod client;
mod types;

pub use client::{GenPdfClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GENERATE_PDF_PATH};
pub use types::{ApiKey, PageMargin, PdfRequest, PdfResponse, RequestId};
