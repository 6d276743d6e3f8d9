//! dumpnote - Dump the internal structure of a .note container.
//!
//! A command line tool that resolves a note container's metadata graph
//! and prints its pages and layers, as readable text or as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use memmap2::Mmap;
use serde::Serialize;

use manta_core::api::load_note;
use manta_core::document::NoteDocument;

/// Dump the internal structure of Supernote .note files.
#[derive(Parser, Debug)]
#[command(name = "dumpnote")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to .note files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Emit JSON instead of readable text
    #[arg(short = 'j', long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

#[derive(Serialize)]
struct LayerDump<'a> {
    name: &'a str,
    protocol: &'a str,
    bitmap_address: u32,
}

#[derive(Serialize)]
struct PageDump<'a> {
    number: u32,
    layers: Vec<LayerDump<'a>>,
}

#[derive(Serialize)]
struct DocumentDump<'a> {
    file: String,
    signature: &'a str,
    width: usize,
    height: usize,
    pages: Vec<PageDump<'a>>,
}

fn dump<'a>(path: &PathBuf, doc: &'a NoteDocument) -> DocumentDump<'a> {
    DocumentDump {
        file: path.display().to_string(),
        signature: &doc.signature,
        width: doc.width,
        height: doc.height,
        pages: doc
            .pages
            .iter()
            .map(|page| PageDump {
                number: page.number,
                layers: page
                    .layers
                    .iter()
                    .map(|layer| LayerDump {
                        name: &layer.name,
                        protocol: &layer.protocol,
                        bitmap_address: layer.bitmap_address,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn dump_text<W: Write>(out: &mut W, d: &DocumentDump) -> io::Result<()> {
    writeln!(out, "{}", d.file)?;
    writeln!(out, "  signature: {}", d.signature)?;
    writeln!(out, "  resolution: {}x{}", d.width, d.height)?;
    writeln!(out, "  pages: {}", d.pages.len())?;
    for page in &d.pages {
        writeln!(out, "  page {}", page.number)?;
        for layer in &page.layers {
            writeln!(
                out,
                "    {:<10} protocol={:<10} bitmap=0x{:08x}",
                layer.name, layer.protocol, layer.bitmap_address
            )?;
        }
    }
    Ok(())
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

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for path in &args.files {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map {}", path.display()))?;
        let doc =
            load_note(&mmap).with_context(|| format!("cannot parse {}", path.display()))?;

        let d = dump(path, &doc);
        if args.json {
            serde_json::to_writer_pretty(&mut out, &d)?;
            writeln!(&mut out)?;
        } else {
            dump_text(&mut out, &d)?;
        }
    }
    out.flush()?;
    Ok(())
}
