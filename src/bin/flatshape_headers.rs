//! flatshape-headers: Derive the union header list of JSON documents
//!
//! Every document is read as a row; the headers of later documents are
//! merged into those of the first, so the output covers all shapes seen.
//!
//! Usage:
//!   flatshape-headers data.json
//!   cat events.jsonl | flatshape-headers --ndjson --sort

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use flatshape::input::{expect_object, read_documents};
use flatshape::{generate_field_names, Options, Record};
use std::fs::File;
use std::io::Read;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flatshape-headers")]
#[command(about = "Derive the union header list of JSON documents", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one JSON object per line)
    #[arg(long)]
    ndjson: bool,

    /// Leave out fields that are null
    #[arg(long)]
    exclude_nil: bool,

    /// Sort headers (numeric-aware)
    #[arg(long)]
    sort: bool,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut options = Options::default();
    if args.exclude_nil {
        options = options.with_exclude_nil();
    }
    if args.sort {
        options = options.with_sort();
    }

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?)
    } else {
        Box::new(std::io::stdin())
    };

    let documents = read_documents(reader, args.ndjson)?;
    if documents.is_empty() {
        warn!("no JSON documents found in input");
        println!("[]");
        return Ok(());
    }

    let records = documents
        .iter()
        .map(|doc| expect_object(doc).map(Record::from_json_object))
        .collect::<Result<Vec<_>>>()?;
    let headers = generate_field_names("", &records, &options)?;

    let output = if args.compact {
        serde_json::to_string(&headers)?
    } else {
        serde_json::to_string_pretty(&headers)?
    };
    println!("{}", output);

    Ok(())
}
