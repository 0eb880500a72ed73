use crate::page_set::PageId;
use thiserror::Error;

/// Errors produced while parsing a page range string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Malformed page range token: '{token}'")]
    MalformedToken { token: String },

    #[error("Invalid page range '{token}': start {start} is greater than end {end}")]
    InvalidRange { token: String, start: u32, end: u32 },

    #[error("Page {page} is out of range (document has {total_pages} pages)")]
    PageOutOfRange { page: u64, total_pages: u32 },
}

/// Errors produced by mutating [`PageSet`](crate::page_set::PageSet) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageSetError {
    #[error("Page {0} is already in the page set")]
    DuplicateIdentity(PageId),

    #[error("Removing {removing} page(s) would leave the document empty")]
    WouldEmptyDocument { removing: usize },
}

/// Why a single output of a split plan could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Range '{0}' selects no pages")]
    EmptyRange(String),

    #[error("Chunk size must be at least 1")]
    ZeroChunkSize,

    #[error("No pages are selected")]
    NothingSelected,
}
