pub mod assemble;
pub mod document;

pub use assemble::Library;
pub use document::{PageInfo, PdfDocument};
