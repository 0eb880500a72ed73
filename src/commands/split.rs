use super::{open_single, write_pages, WrittenFile};
use anyhow::{bail, Context, Result};
use pdfpages::{plan, SplitMode};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct SplitSummary {
    pub written: Vec<WrittenFile>,
    pub failures: Vec<String>,
}

/// Write one file per planned output. Outputs that cannot be planned are
/// reported in the summary; the call only fails if nothing could be written.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    mode: &SplitMode,
) -> Result<SplitSummary> {
    let output_dir = output_dir.as_ref();

    let (library, id) = open_single(input.as_ref())?;
    let set = library.page_set()?;

    let result = plan(&set, mode, &id);
    let failures: Vec<String> = result
        .failures
        .iter()
        .map(|f| format!("output {}: {}", f.index + 1, f.error))
        .collect();

    if result.outputs.is_empty() {
        if failures.is_empty() {
            bail!("Nothing to split");
        }
        bail!("No outputs could be planned: {}", failures.join("; "));
    }

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(result.outputs.len());
    for output in &result.outputs {
        let path = output_dir.join(format!("{}.pdf", output.name));
        written.push(write_pages(&library, &output.pages, &path)?);
    }

    for failure in &failures {
        warn!("skipped {}", failure);
    }

    Ok(SplitSummary { written, failures })
}
