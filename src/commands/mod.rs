pub mod delete_pages;
pub mod extract;
pub mod info;
pub mod merge;
pub mod organize;
pub mod split;

use anyhow::Result;
use pdfpages::pdf::{Library, PdfDocument};
use pdfpages::PageRef;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct WrittenFile {
    pub path: String,
    pub page_count: u32,
}

/// Base name for derived output files.
pub(crate) fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("page")
}

/// Load a single source into a fresh library under its file stem.
pub(crate) fn open_single(path: &Path) -> Result<(Library, String)> {
    let id = file_stem(path).to_string();
    let mut library = Library::new();
    library.open(id.as_str(), path)?;
    Ok((library, id))
}

/// Assemble `pages` from `library` and save them to `output`.
pub(crate) fn write_pages(library: &Library, pages: &[PageRef], output: &Path) -> Result<WrittenFile> {
    let mut doc = library.assemble(pages)?;
    PdfDocument::save(&mut doc, output)?;
    info!(path = %output.display(), pages = pages.len(), "wrote document");
    Ok(WrittenFile {
        path: output.display().to_string(),
        page_count: u32::try_from(pages.len()).unwrap_or(u32::MAX),
    })
}

#[cfg(test)]
pub(crate) mod testutil {
    use lopdf::{Dictionary, Document, Object, Stream};
    use std::path::{Path, PathBuf};

    /// Fresh scratch directory for one test.
    pub fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pdfpages-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a PDF with `num_pages` blank Letter pages to `path`.
    pub fn write_test_pdf(path: &Path, num_pages: u32) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (1..=num_pages)
            .map(|n| {
                let content = format!("BT /F1 12 Tf 50 700 Td (Page-{}) Tj ET", n);
                let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
                let mut page = Dictionary::new();
                page.set("Type", Object::Name(b"Page".to_vec()));
                page.set("Parent", Object::Reference(pages_id));
                page.set("Contents", Object::Reference(content_id));
                page.set(
                    "MediaBox",
                    vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ],
                );
                Object::Reference(doc.add_object(page))
            })
            .collect();

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(num_pages as i64));
        pages.set("Kids", kids);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        doc.save(path).unwrap();
    }

    pub fn page_count(path: &Path) -> u32 {
        Document::load(path).unwrap().get_pages().len() as u32
    }
}
