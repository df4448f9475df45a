//! MCP Server implementation using rmcp

use crate::genpdf::{
    ApiKey, GenPdfClient, PageMargin, PdfRequest, RequestId, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const TOOL_NAME: &str = "generate_pdf";

/// Name reported to MCP clients during initialization
pub const SERVER_NAME: &str = "gen-pdf-server";

/// Environment variable holding the Gen-PDF bearer credential
pub const API_KEY_ENV: &str = "GEN_PDF_API_KEY";
/// Environment variable enabling debug logging
pub const DEBUG_ENV: &str = "GEN_PDF_DEBUG";
/// Environment variable overriding the upstream base URL
pub const BASE_URL_ENV: &str = "GEN_PDF_BASE_URL";

/// Configuration for the Gen-PDF MCP Server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Gen-PDF API key (default: none, an empty bearer value is sent)
    pub api_key: ApiKey,
    /// Verbose diagnostic logging (default: false)
    pub debug: bool,
    /// Upstream base URL (default: https://proxy.gen-pdf.com)
    pub base_url: String,
    /// Upper bound on one generation call (default: 30s)
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::none(),
            debug: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_key: ApiKey::from(lookup(API_KEY_ENV)),
            debug: lookup(DEBUG_ENV).map(|v| parse_flag(&v)).unwrap_or(false),
            base_url: lookup(BASE_URL_ENV)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Gen-PDF MCP Server
#[derive(Clone)]
pub struct GenPdfServer {
    client: Arc<GenPdfClient>,
    tool_router: ToolRouter<Self>,
    debug: bool,
}

// ============================================================================
// Request types for generate_pdf
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfParams {
    /// Markdown content to convert to PDF
    pub markdown_document: String,
    /// Title for the PDF document
    #[serde(default, alias = "documentTitle")]
    pub title: Option<String>,
    /// Subtitle for the PDF document
    #[serde(default, alias = "documentSubtitle")]
    pub subtitle: Option<String>,
    /// Authors shown on the cover page, in order
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    /// Page margins: "small", "medium" or "large" (default: large)
    #[serde(default)]
    pub page_margin: Option<PageMargin>,
    /// Add a cover page (default: false)
    #[serde(default)]
    pub cover: Option<bool>,
    /// Add a table of contents (default: false)
    #[serde(default)]
    pub toc: Option<bool>,
    /// Enable page numbering (default: true)
    #[serde(default)]
    pub enable_page_numbering: Option<bool>,
    /// Dark theme. Accepted for compatibility; the service no longer supports it
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

impl GeneratePdfParams {
    /// Params with only the markdown document set
    pub fn new(markdown_document: impl Into<String>) -> Self {
        Self {
            markdown_document: markdown_document.into(),
            title: None,
            subtitle: None,
            authors: None,
            page_margin: None,
            cover: None,
            toc: None,
            enable_page_numbering: None,
            dark_mode: None,
        }
    }

    /// Convert into the upstream request, applying defaults.
    /// Blank strings and empty author lists are dropped.
    pub fn into_request(self) -> PdfRequest {
        let defaults = PdfRequest::new(String::new());
        PdfRequest {
            document: self.markdown_document,
            title: non_blank(self.title),
            subtitle: non_blank(self.subtitle),
            authors: self
                .authors
                .map(|authors| {
                    authors
                        .into_iter()
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|authors| !authors.is_empty()),
            page_margin: self.page_margin.unwrap_or(defaults.page_margin),
            cover: self.cover.unwrap_or(defaults.cover),
            toc: self.toc.unwrap_or(defaults.toc),
            enable_page_numbering: self
                .enable_page_numbering
                .unwrap_or(defaults.enable_page_numbering),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl GenPdfServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new GenPdfServer with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        if !config.api_key.is_configured() {
            tracing::warn!("{} is not set; Gen-PDF will reject requests", API_KEY_ENV);
        }
        if config.debug {
            tracing::info!("Starting Gen-PDF MCP Server in debug mode");
        }
        let debug = config.debug;
        let client = GenPdfClient::new(config.base_url, config.api_key, config.timeout);
        let server = Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
            debug,
        };
        if debug {
            tracing::info!(tool = TOOL_NAME, "Registered tool for PDF generation");
        }
        server
    }

    /// Whether verbose per-call logging is on
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Generate a PDF from markdown through Gen-PDF
    #[tool(
        description = "Generate a professional PDF document from markdown content using Gen-PDF. Supports advanced formatting, code highlighting, math expressions, tables, and styling options such as cover page, table of contents, page margins and page numbering. Returns a hosted download link."
    )]
    async fn generate_pdf(
        &self,
        Parameters(params): Parameters<GeneratePdfParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(self.process_generate_pdf(params).await)
    }
}

impl GenPdfServer {
    /// Run one generate_pdf invocation. Every failure is returned as an
    /// error result, never as a protocol error.
    pub async fn process_generate_pdf(&self, params: GeneratePdfParams) -> CallToolResult {
        let request_id = RequestId::generate(TOOL_NAME);

        if params.dark_mode.is_some() {
            tracing::debug!(%request_id, "darkMode is not forwarded to Gen-PDF");
        }

        let request = params.into_request();
        tracing::info!(
            %request_id,
            title = request.title.as_deref().unwrap_or("<untitled>"),
            "Starting PDF generation"
        );
        if request.title.is_none() {
            tracing::warn!(%request_id, "No document title supplied");
        }
        if self.debug {
            tracing::info!(
                %request_id,
                document_chars = request.document.chars().count(),
                page_margin = ?request.page_margin,
                cover = request.cover,
                toc = request.toc,
                page_numbering = request.enable_page_numbering,
                "Request options"
            );
        }

        match self.client.generate(&request, &request_id).await {
            Ok(response) => {
                tracing::info!(%request_id, url = %response.url, "PDF generated successfully");
                CallToolResult::success(vec![Content::text(format!(
                    "✅ PDF generated successfully! 🔗 **Download Link**: {}",
                    response.url
                ))])
            }
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "generate_pdf failed");
                CallToolResult::error(vec![Content::text(e.client_message())])
            }
        }
    }
}

impl Default for GenPdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for GenPdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Gen-PDF MCP Server converts markdown into professionally typeset PDF documents \
                 (code highlighting, LaTeX math, tables, cover page, table of contents) and \
                 returns a hosted download link."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with configuration taken from the environment
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::from_env()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = GenPdfServer::with_config(config);

    tracing::info!("Gen-PDF MCP Server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
