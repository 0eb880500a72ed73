use super::{file_stem, write_pages, WrittenFile};
use anyhow::{bail, Result};
use pdfpages::pdf::Library;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<WrittenFile> {
    if inputs.is_empty() {
        bail!("No input files specified");
    }

    // The same file may be given twice, so ids carry the argument position.
    let mut library = Library::new();
    for (i, input) in inputs.iter().enumerate() {
        let id = format!("{}#{}", file_stem(input.as_ref()), i + 1);
        library.open(id, input)?;
    }

    let set = library.page_set()?;
    write_pages(&library, set.entries(), output.as_ref())
}
