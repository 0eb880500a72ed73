use super::{open_single, write_pages, WrittenFile};
use anyhow::{bail, Result};
use pdfpages::{plan, RangeSpec, SplitMode};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<WrittenFile> {
    let (library, id) = open_single(input.as_ref())?;
    let mut set = library.page_set()?;

    let spec = RangeSpec::parse(pages, set.page_total())?;
    if spec.is_empty() {
        bail!("No pages specified");
    }
    set.select_positions(&spec);

    let result = plan(&set, &SplitMode::Selected, &id);
    let Some(selection) = result.outputs.first() else {
        bail!("No pages specified");
    };

    write_pages(&library, &selection.pages, output.as_ref())
}
