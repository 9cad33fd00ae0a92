use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use golden_retrace::{normalize_log, GoldenMapping, LogRewriter, MappingIndex};

#[derive(Debug, Parser)]
#[command(name = "golden-retrace")]
#[command(about = "Rewrites obfuscated names in a log file back to their golden names")]
struct Cli {
    /// The golden mapping file.
    #[arg(short, long, value_name = "FILE", default_value = "golden.txt")]
    mapping: PathBuf,

    /// The obfuscated log file.
    #[arg(short, long, value_name = "FILE", default_value = "obfuscated.log")]
    input: PathBuf,

    /// Where to write the rewritten log.
    #[arg(short, long, value_name = "FILE", default_value = "golden.log")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mapping_text = fs::read_to_string(&cli.mapping)
        .with_context(|| format!("failed to read mapping file {}", cli.mapping.display()))?;
    let log_text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read log file {}", cli.input.display()))?;

    let start = Instant::now();

    let mapping = GoldenMapping::new(&mapping_text);
    let rewriter = LogRewriter::new(MappingIndex::parse(&mapping));
    let rewritten = rewriter.rewrite(&normalize_log(&log_text));

    fs::write(&cli.output, rewritten)
        .with_context(|| format!("failed to write output file {}", cli.output.display()))?;

    println!("completed in {:?}", start.elapsed());

    Ok(())
}
