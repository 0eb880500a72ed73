use pdfpages::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;

    println!("File: {}", path.as_ref().display());
    println!("Pages: {}", doc.page_count());

    for page in doc.page_info()? {
        let rotation = if page.rotation == 0 {
            String::new()
        } else {
            format!(" (rotated {}°)", page.rotation)
        };
        println!(
            "  p{}: {:.0} x {:.0} pt{}",
            page.number, page.width, page.height, rotation
        );
    }

    Ok(())
}
