use clap::{ArgGroup, Args, Parser, Subcommand};
use pdfpages::SplitMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpages")]
#[command(about = "Select, split, merge and reorder PDF pages, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Show page count and page sizes
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Normalize a page range against a page count
    Ranges {
        /// Page ranges (e.g., "1-5,10")
        pages: String,

        /// Total number of pages
        #[arg(short, long)]
        total: u32,
    },

    /// Extract page ranges to a new PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-5,10,15-20")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a PDF into several files
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        #[command(flatten)]
        mode: SplitArgs,
    },

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Remove pages from a PDF
    DeletePages {
        /// PDF file to edit
        path: PathBuf,

        /// Pages to delete (e.g., "2,4-6")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Reorder, rotate, duplicate and delete pages
    Organize {
        /// PDF file to edit
        path: PathBuf,

        /// Edits applied in order: move:P:TO, rotate:RANGE:left|right,
        /// delete:RANGE, duplicate:P, select:RANGE, rotate-selected:DIR,
        /// delete-selected, undo, redo
        #[arg(long = "op", required = true)]
        ops: Vec<String>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Split mode; one file per page when no option is given.
#[derive(Args)]
#[command(group(ArgGroup::new("split_mode").args(["range", "ranges", "every"])))]
pub struct SplitArgs {
    /// Single inclusive range, e.g. "3-7"
    #[arg(long)]
    pub range: Option<String>,

    /// One output per range, e.g. --ranges 1-3 --ranges 4,6
    #[arg(long, num_args = 1..)]
    pub ranges: Vec<String>,

    /// Fixed-size chunks of N pages
    #[arg(long, value_name = "N")]
    pub every: Option<u32>,
}

impl SplitArgs {
    pub fn into_mode(self) -> anyhow::Result<SplitMode> {
        if let Some(range) = self.range {
            let (start, end) = range
                .split_once('-')
                .and_then(|(s, e)| Some((s.trim().parse::<u32>().ok()?, e.trim().parse::<u32>().ok()?)))
                .ok_or_else(|| anyhow::anyhow!("Invalid range: {} (expected START-END)", range))?;
            return Ok(SplitMode::SingleRange { start, end });
        }
        if !self.ranges.is_empty() {
            return Ok(SplitMode::CustomRanges(self.ranges));
        }
        if let Some(size) = self.every {
            return Ok(SplitMode::Chunks { size });
        }
        Ok(SplitMode::ExtractAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_args(args: &[&str]) -> SplitMode {
        let cli = Cli::try_parse_from(["pdfpages", "split", "in.pdf", "-o", "out"].iter().chain(args))
            .unwrap();
        match cli.command {
            Commands::Split { mode, .. } => mode.into_mode().unwrap(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_split_mode_defaults_to_all_pages() {
        assert_eq!(split_args(&[]), SplitMode::ExtractAll);
    }

    #[test]
    fn test_split_mode_options() {
        assert_eq!(
            split_args(&["--range", "2-5"]),
            SplitMode::SingleRange { start: 2, end: 5 }
        );
        assert_eq!(
            split_args(&["--ranges", "1-3", "7"]),
            SplitMode::CustomRanges(vec!["1-3".into(), "7".into()])
        );
        assert_eq!(split_args(&["--every", "4"]), SplitMode::Chunks { size: 4 });
    }

    #[test]
    fn test_split_modes_are_exclusive() {
        let result = Cli::try_parse_from([
            "pdfpages", "split", "in.pdf", "-o", "out", "--range", "1-2", "--every", "2",
        ]);
        assert!(result.is_err());
    }
}
