pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use model::{Options, Run};
use writer::json::JsonLines;

pub fn run() -> Result<()> {
    let args = cli::Cli::parse();
    init_logging(&args);

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let run = extract(&args.options(), out)?;
    log::debug!(
        "{} blocks found, {} diagnostics",
        run.blocks.len(),
        run.diagnostics.entries.len()
    );
    Ok(())
}

fn init_logging(args: &cli::Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

/// Scan every input in order and write the selected records to `out`.
///
/// Returns the run context with every block discovered, including the ones
/// that were filtered out or dropped, and every diagnostic raised.
pub fn extract<W: Write>(options: &Options, out: W) -> Result<Run> {
    let mut run = Run::default();
    let mut writer = JsonLines::new(out);

    let result = extract_into(options, &mut run, &mut writer);
    writer.flush().with_context(|| "Flushing output")?;
    result.map(|()| run)
}

fn extract_into<W: Write>(
    options: &Options,
    run: &mut Run,
    writer: &mut JsonLines<W>,
) -> Result<()> {
    for path in &options.files {
        // 1. ── Parse ──────────────────────────────────────────────────
        let mut source = parser::open(path, options.default_filetype.as_deref())?;
        let mut scanner = source.scanner();

        while let Some(id) = scanner
            .next_block(run)
            .with_context(|| format!("Reading {}", path.display()))?
        {
            // 2. ── Process ────────────────────────────────────────────
            let block = &run.blocks[id];
            let Some(content) = processor::content(block, &mut run.diagnostics) else {
                continue;
            };

            // 3. ── Write ──────────────────────────────────────────────
            if options.selection.includes(block.kind) {
                writer
                    .emit(block, &content)
                    .with_context(|| "Writing output")?;
            }
        }
    }
    Ok(())
}
