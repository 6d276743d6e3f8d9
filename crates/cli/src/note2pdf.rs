//! note2pdf - Convert Supernote .note files to PDF.
//!
//! A command line tool that renders every page of one or more note
//! containers and writes each as a standalone PDF.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use memmap2::Mmap;

use manta_core::api::{ConvertOptions, convert_note};

/// Convert Supernote .note files to PDF.
#[derive(Parser, Debug)]
#[command(name = "note2pdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to .note files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to the output PDF, or "-" for stdout.
    /// Only valid with a single input file; the default is the input
    /// path with a .pdf extension.
    #[arg(short = 'o', long)]
    outfile: Option<String>,

    /// A comma-separated list of page numbers to convert (1-indexed)
    #[arg(short = 'p', long = "pagenos")]
    pagenos: Option<String>,

    /// The maximum number of pages to convert (0 = no limit)
    #[arg(short = 'm', long, default_value = "0")]
    maxpages: usize,

    /// Worker threads for page rendering (0 = one per core)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn parse_page_numbers(pagenos: Option<&str>) -> Option<Vec<usize>> {
    let nums: Vec<usize> = pagenos?
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.trim().parse::<usize>().ok())
        .map(|n| n.saturating_sub(1))
        .collect();
    if nums.is_empty() { None } else { Some(nums) }
}

fn init_logging(debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(if debug { "debug" } else { "warn" })
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_outfile(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if args.outfile.is_some() && args.files.len() > 1 {
        anyhow::bail!("--outfile is only valid with a single input file");
    }

    let options = ConvertOptions {
        page_numbers: parse_page_numbers(args.pagenos.as_deref()),
        maxpages: args.maxpages,
        thread_count: args.threads,
    };

    for path in &args.files {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map {}", path.display()))?;

        let pdf = convert_note(&mmap, Some(options.clone()))
            .with_context(|| format!("conversion failed for {}", path.display()))?;

        match args.outfile.as_deref() {
            Some("-") => std::io::stdout().write_all(&pdf)?,
            Some(out) => std::fs::write(out, &pdf)
                .with_context(|| format!("failed to write {out}"))?,
            None => {
                let out = default_outfile(path);
                std::fs::write(&out, &pdf)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                eprintln!("{} -> {}", path.display(), out.display());
            }
        }
    }
    Ok(())
}
