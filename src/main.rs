mod cli;
mod commands;
mod mcp;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pdfpages::RangeSpec;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "pdfpages=warn",
        1 => "pdfpages=info",
        _ => "pdfpages=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries command output and the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Ranges { pages, total } => {
            let spec = RangeSpec::parse(&pages, total)?;
            if spec.is_empty() {
                println!("No pages selected");
            } else {
                println!("{} ({} page(s))", spec, spec.len());
            }
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            let written = commands::extract::run(&path, &pages, &output)?;
            println!(
                "Extracted {} page(s) to {}",
                written.page_count, written.path
            );
        }
        Commands::Split {
            path,
            output_dir,
            mode,
        } => {
            let summary = commands::split::run(&path, &output_dir, &mode.into_mode()?)?;
            for failure in &summary.failures {
                eprintln!("Skipped {}", failure);
            }
            println!(
                "Split {} into {} file(s) in {}",
                path.display(),
                summary.written.len(),
                output_dir.display()
            );
        }
        Commands::Merge { inputs, output } => {
            let written = commands::merge::run(&inputs, &output)?;
            println!(
                "Merged {} files ({} pages) into {}",
                inputs.len(),
                written.page_count,
                written.path
            );
        }
        Commands::DeletePages {
            path,
            pages,
            output,
        } => {
            let summary = commands::delete_pages::run(&path, &pages, &output)?;
            println!(
                "Deleted {} page(s), wrote {} page(s) to {}",
                summary.removed, summary.written.page_count, summary.written.path
            );
        }
        Commands::Organize { path, ops, output } => {
            let summary = commands::organize::run(&path, &ops, &output)?;
            println!(
                "Applied {} edit(s), wrote {} page(s) to {}",
                summary.edits, summary.written.page_count, summary.written.path
            );
        }
    }

    Ok(())
}
