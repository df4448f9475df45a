//! Gen-PDF MCP Server Library
//!
//! This crate provides one MCP tool:
//! - `generate_pdf`: Convert a markdown document into a hosted PDF through the
//!   Gen-PDF API and return the download link

pub mod error;
pub mod genpdf;
pub mod server;

pub use error::{Error, Result};
pub use server::{
    run_server, run_server_with_config, GenPdfServer, GeneratePdfParams, ServerConfig,
};
