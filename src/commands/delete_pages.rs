use super::{open_single, write_pages, WrittenFile};
use anyhow::{bail, Result};
use pdfpages::RangeSpec;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct DeleteSummary {
    pub removed: usize,
    #[serde(flatten)]
    pub written: WrittenFile,
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<DeleteSummary> {
    let (library, _) = open_single(input.as_ref())?;
    let mut set = library.page_set()?;

    let spec = RangeSpec::parse(pages, set.page_total())?;
    if spec.is_empty() {
        bail!("No pages specified");
    }

    let ids: HashSet<_> = set.ids_at(&spec).into_iter().collect();
    let removed = set.remove(&ids)?;

    let written = write_pages(&library, set.entries(), output.as_ref())?;
    Ok(DeleteSummary { removed, written })
}
