use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use memmap2::{Mmap, MmapOptions};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gradejson::normalize::normalize_separators;
use gradejson::repair::SyntaxRepairer;
use gradejson::{recover_bytes, stats, ExtractOptions};

/// Recover exam-grade JSON objects from a defective bulk export.
#[derive(Parser)]
#[command(name = "gradejson", version)]
#[command(about = "Recover exam-grade JSON objects from a defective bulk export")]
struct Cli {
    /// Input file, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Output file for the recovered JSON array, or `-` for stdout.
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Report format printed to stderr.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,

    /// Emit the output array on one line instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Skip the per-grade statistics block.
    #[arg(long)]
    no_stats: bool,

    /// First field of every object; its value becomes the object's key.
    #[arg(long, default_value = "grade")]
    anchor_field: String,

    /// Comma-separated numeric fields known to grow a stray trailing quote.
    #[arg(long, default_value = "question_number")]
    numeric_fields: String,

    /// Comma-separated canonical key order; unknown keys sort last.
    #[arg(long, default_value = "5,4,3,pre2,2,pre1,1")]
    key_order: String,

    /// Field holding each object's nested item list.
    #[arg(long, default_value = "questions")]
    items_field: String,

    /// Context bytes kept on each side of a parse failure.
    #[arg(long, default_value_t = 100)]
    context_chars: usize,

    /// Insert separator commas only at brace depth zero (string-aware).
    #[arg(long)]
    depth_zero_commas: bool,

    /// Write the normalized intermediate text to this file.
    #[arg(long)]
    dump_normalized: Option<PathBuf>,

    /// Write the repaired intermediate text to this file.
    #[arg(long)]
    dump_repaired: Option<PathBuf>,

    /// Read the input file without memory-mapping it.
    #[arg(long)]
    no_mmap: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

enum InputData {
    Owned(Vec<u8>),
    Mapped { _file: File, mmap: Mmap },
}

impl InputData {
    fn as_bytes(&self) -> &[u8] {
        match self {
            InputData::Owned(v) => v.as_slice(),
            InputData::Mapped { mmap, .. } => mmap.as_ref(),
        }
    }
}

fn read_input(path: &str, no_mmap: bool) -> io::Result<InputData> {
    if path == "-" {
        let mut buf: Vec<u8> = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(InputData::Owned(buf));
    }
    if no_mmap {
        return Ok(InputData::Owned(std::fs::read(path)?));
    }
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(InputData::Owned(Vec::new()));
    }
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    Ok(InputData::Mapped { _file: file, mmap })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    let opts = ExtractOptions {
        anchor_field: cli.anchor_field.clone(),
        numeric_fields: split_list(&cli.numeric_fields),
        key_order: split_list(&cli.key_order),
        items_field: cli.items_field.clone(),
        context_chars: cli.context_chars,
        comma_insert_depth_zero_only: cli.depth_zero_commas,
    };

    let input = read_input(&cli.input, cli.no_mmap)
        .with_context(|| format!("failed to read {}", cli.input))?;
    info!(bytes = input.as_bytes().len(), "input loaded");

    if cli.dump_normalized.is_some() || cli.dump_repaired.is_some() {
        let text = String::from_utf8_lossy(input.as_bytes());
        let normalized = normalize_separators(&text);
        if let Some(path) = &cli.dump_normalized {
            std::fs::write(path, &normalized)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        if let Some(path) = &cli.dump_repaired {
            let (repaired, _) = SyntaxRepairer::new(&opts).repair(&normalized);
            std::fs::write(path, repaired)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    let recovery = match recover_bytes(input.as_bytes(), &opts) {
        Ok(recovery) => recovery,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match cli.report {
        ReportFormat::Text => {
            for line in recovery.report.diagnostic_lines(&opts.items_field) {
                eprintln!("{line}");
            }
            if !cli.no_stats {
                let summary =
                    stats::summarize(&recovery.objects, &opts.anchor_field, &opts.items_field);
                for line in summary.lines() {
                    eprintln!("{line}");
                }
            }
        }
        ReportFormat::Json => {
            eprintln!("{}", serde_json::to_string_pretty(&recovery.report)?);
        }
    }

    let mut rendered = if cli.compact {
        serde_json::to_string(&recovery.objects)?
    } else {
        serde_json::to_string_pretty(&recovery.objects)?
    };
    rendered.push('\n');

    if cli.output == "-" {
        io::stdout().lock().write_all(rendered.as_bytes())?;
    } else {
        std::fs::write(&cli.output, rendered)
            .with_context(|| format!("failed to write {}", cli.output))?;
    }

    if !recovery.report.is_success() {
        std::process::exit(2);
    }
    Ok(())
}
