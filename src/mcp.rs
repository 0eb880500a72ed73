use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::commands;
use pdfpages::pdf::PdfDocument;
use pdfpages::{RangeSpec, SplitMode};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRangesRequest {
    #[schemars(description = "Page ranges (e.g., '1-5,10,12-14')")]
    pub pages: String,
    #[schemars(description = "Total number of pages in the document")]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PagesRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5,10,12-14')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Directory to write the split files into")]
    pub output_dir: String,
    #[schemars(description = "Single inclusive range 'START-END'")]
    #[serde(default)]
    pub range: Option<String>,
    #[schemars(description = "One output file per range string")]
    #[serde(default)]
    pub ranges: Vec<String>,
    #[schemars(description = "Split into chunks of this many pages")]
    #[serde(default)]
    pub every: Option<u32>,
}

impl SplitRequest {
    fn mode(&self) -> Result<SplitMode> {
        crate::cli::SplitArgs {
            range: self.range.clone(),
            ranges: self.ranges.clone(),
            every: self.every,
        }
        .into_mode()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeRequest {
    #[schemars(description = "PDF files to merge, in order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct OrganizeRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(
        description = "Edits applied in order: 'move:P:TO', 'rotate:RANGE:left|right', 'delete:RANGE', 'duplicate:P', 'select:RANGE', 'rotate-selected:DIR', 'delete-selected', 'undo', 'redo'. Positions are 1-based."
    )]
    pub ops: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error: {}", e))
        }
        Err(e) => format!("Error: {:#}", e),
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the page count of a PDF")]
    fn pdf_page_count(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        to_json(PdfDocument::open(&path).map(|doc| PageCountResult {
            page_count: doc.page_count(),
            path,
        }))
    }

    #[tool(description = "Normalize a page range string like '1-3,7' into a sorted list of page numbers, validating it against the page count")]
    fn pdf_parse_ranges(&self, Parameters(req): Parameters<ParseRangesRequest>) -> String {
        to_json(
            RangeSpec::parse(&req.pages, req.total_pages)
                .map(|spec| ParseRangesResult {
                    normalized: spec.to_string(),
                    pages: spec,
                })
                .map_err(anyhow::Error::from),
        )
    }

    #[tool(description = "Extract specific pages from a PDF and save them to a new file")]
    fn pdf_extract(&self, Parameters(req): Parameters<PagesRequest>) -> String {
        to_json(commands::extract::run(&req.path, &req.pages, &req.output))
    }

    #[tool(description = "Split a PDF into several files: one per page by default, or by a single range, a list of ranges, or fixed-size chunks. Ranges that fail to parse are reported without aborting the others.")]
    fn pdf_split(&self, Parameters(req): Parameters<SplitRequest>) -> String {
        to_json(
            req.mode()
                .and_then(|mode| commands::split::run(&req.path, &req.output_dir, &mode)),
        )
    }

    #[tool(description = "Combine multiple PDFs into one, in the given order")]
    fn pdf_merge(&self, Parameters(req): Parameters<MergeRequest>) -> String {
        to_json(commands::merge::run(&req.inputs, &req.output))
    }

    #[tool(description = "Delete pages from a PDF and save the rest to a new file. At least one page must remain.")]
    fn pdf_delete_pages(&self, Parameters(req): Parameters<PagesRequest>) -> String {
        to_json(commands::delete_pages::run(&req.path, &req.pages, &req.output))
    }

    #[tool(description = "Reorder, rotate, duplicate and delete pages of a PDF with a list of edit steps, then save the result")]
    fn pdf_organize(&self, Parameters(req): Parameters<OrganizeRequest>) -> String {
        to_json(commands::organize::run(&req.path, &req.ops, &req.output))
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageCountResult {
    pub path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize)]
pub struct ParseRangesResult {
    pub pages: RangeSpec,
    pub normalized: String,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page tools. Use pdf_page_count to learn how many pages a document has, \
                 pdf_parse_ranges to check a page range, pdf_extract and pdf_delete_pages to \
                 select pages, pdf_split to split into several files, pdf_merge to combine \
                 documents, and pdf_organize to reorder and rotate pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
