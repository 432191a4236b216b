//! RTC Stats Tabulator CLI
//!
//! Command-line front end for the rtc-stats-parser library. It adds:
//! - Argument parsing and logging setup
//! - Malformed-line policy selection (fail-fast vs. skip)
//! - Table serialization (CSV default, JSON optional)

use anyhow::{Context, Result};
use clap::Parser;
use rtc_stats_parser::{parse_file_with_config, MalformedLineMode, ParserConfig};
use std::path::PathBuf;

mod writer;

use writer::OutputFormat;

/// RTC Stats Tabulator - Convert multi-report stats logs to CSV
#[derive(Parser, Debug)]
#[command(name = "rtc-stats-cli")]
#[command(about = "Convert multi-report RTC stats text logs to a normalized table", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the stats log to convert
    #[arg(value_name = "INPUT_LOG")]
    input: PathBuf,

    /// Path to write the converted table to (overwritten if present)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Skip malformed field lines with a warning instead of failing
    #[arg(long)]
    skip_malformed: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("RTC Stats Tabulator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using parser library v{}", rtc_stats_parser::VERSION);

    let mode = if args.skip_malformed {
        MalformedLineMode::Skip
    } else {
        MalformedLineMode::Fail
    };
    let config = ParserConfig::new().with_malformed_lines(mode);

    // Parse fully before touching the output path, so a failed run never
    // leaves a partial file behind
    let table = parse_file_with_config(&args.input, &config)
        .with_context(|| format!("failed to parse {:?}", args.input))?;

    log::info!(
        "Parsed {} reports across {} columns",
        table.len(),
        table.columns().len()
    );

    writer::write_table(&table, &args.output, args.format)
        .with_context(|| format!("failed to write {:?}", args.output))?;

    log::info!("Wrote {:?}", args.output);
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
