//! loggrep CLI
//!
//! Prints every access-log line attributed to a user token across the
//! objects under an S3 prefix, optionally appending them to a local file.

use clap::Parser;
use lg_cli_common::{format_bytes, format_number};

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // stderr only: stdout carries matched lines
    lg_cli_common::init_logging(args.log_level)?;

    let quiet = args.quiet;
    let stats = run::execute(args).await?;

    if quiet {
        return Ok(());
    }

    eprintln!();
    eprintln!("Scan completed:");
    eprintln!("  Objects listed:  {}", format_number(stats.objects_listed));
    eprintln!("  Objects scanned: {}", format_number(stats.objects_scanned));
    eprintln!("  Bytes fetched:   {}", format_bytes(stats.bytes_fetched));
    eprintln!("  Bytes decoded:   {}", format_bytes(stats.bytes_decoded));
    eprintln!("  Lines scanned:   {}", format_number(stats.lines_scanned));
    eprintln!("  Lines matched:   {}", format_number(stats.lines_matched));

    if let Some(duration) = stats.duration() {
        let secs = duration.num_milliseconds() as f64 / 1000.0;
        eprintln!("  Duration:        {:.2}s", secs);
    }

    if let Some(rate) = stats.objects_per_second() {
        if stats.objects_scanned > 0 {
            eprintln!("  Throughput:      {:.1} objects/sec", rate);
        }
    }

    Ok(())
}
