//! flatshape-flatten: Flatten JSON documents into ordered [path, value] rows
//!
//! Usage:
//!   # Read from file, generate headers from each document
//!   flatshape-flatten --generate data.json
//!
//!   # Read from stdin, keep only the given headers
//!   echo '{"name": "Ann", "tags": ["x", "y"]}' | flatshape-flatten --headers name,tags
//!
//!   # Process NDJSON, one output line per document
//!   flatshape-flatten --ndjson --generate --compact events.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use flatshape::input::{expect_object, read_documents};
use flatshape::{flatten_struct_fields, Options, Record};
use std::fs::File;
use std::io::Read;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flatshape-flatten")]
#[command(about = "Flatten JSON documents into ordered [path, value] rows", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one JSON object per line)
    #[arg(long)]
    ndjson: bool,

    /// Comma-separated headers; output is pruned to these and ordered by them
    #[arg(long)]
    headers: Option<String>,

    /// Generate headers from each document when none are given
    #[arg(long)]
    generate: bool,

    /// Leave out fields that are null instead of emitting a placeholder
    #[arg(long)]
    exclude_nil: bool,

    /// Sort generated headers (numeric-aware)
    #[arg(long)]
    sort: bool,

    /// Options as a JSON object; flags above are applied on top
    #[arg(long, value_name = "JSON")]
    options: Option<String>,

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
    let options = build_options(&args)?;

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?)
    } else {
        Box::new(std::io::stdin())
    };

    let documents = read_documents(reader, args.ndjson)?;
    if documents.is_empty() {
        warn!("no JSON documents found in input");
    }

    for (index, document) in documents.iter().enumerate() {
        let record = Record::from_json_object(expect_object(document)?);
        let flat = flatten_struct_fields(&record, &options)
            .with_context(|| format!("Failed to flatten document {}", index))?;
        debug!(document = index, rows = flat.rows.len(), "flattened document");

        let output = if args.compact {
            serde_json::to_string(&flat.rows)?
        } else {
            serde_json::to_string_pretty(&flat.rows)?
        };
        println!("{}", output);
    }

    Ok(())
}

fn build_options(args: &Args) -> Result<Options> {
    let mut options: Options = match &args.options {
        Some(raw) => serde_json::from_str(raw).context("Failed to parse --options")?,
        None => Options::default(),
    };

    if let Some(headers) = &args.headers {
        options = options.with_headers(headers.split(',').map(str::trim).filter(|h| !h.is_empty()));
    }
    if args.generate {
        options = options.with_generate();
    }
    if args.exclude_nil {
        options = options.with_exclude_nil();
    }
    if args.sort {
        options = options.with_sort();
    }
    Ok(options)
}
