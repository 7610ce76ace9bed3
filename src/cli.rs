// src/cli.rs
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use clap::Parser;

use crate::config::AppOptions;
use crate::error::Result;
use crate::progress::Progress;
use crate::normalize::datetime::truncate_to_seconds;
use crate::{file, log, runner};

/// Extract PSEL event cards from saved HTML pages and merge them into match-keyed JSON.
#[derive(Debug, Parser)]
#[command(name = "psel_scrape", version, about)]
pub struct Args {
    /// Saved HTML pages, merged in the order given.
    #[arg(required = true, value_name = "HTML")]
    pub inputs: Vec<PathBuf>,

    /// Output JSON file (a trailing `/` means a directory).
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// TOML options file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Single-line JSON.
    #[arg(long)]
    pub compact: bool,

    /// Skip cards whose link already appeared earlier in the same page.
    #[arg(long)]
    pub dedupe_urls: bool,

    /// Reference time for relative dates, e.g. 2024-01-10T22:00:00 (default: local now).
    #[arg(long, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Log filter (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Shorthand for --log-level debug.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_now(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))
}

impl Args {
    /// Options file first, flags on top.
    pub fn options(&self) -> Result<AppOptions> {
        let mut opts = match &self.config {
            Some(path) => AppOptions::load(path)?,
            None => AppOptions::default(),
        };
        if let Some(out) = &self.out {
            opts.export.out_path = out.clone();
        }
        if self.compact {
            opts.export.pretty = false;
        }
        if self.dedupe_urls {
            opts.scrape.dedupe_urls = true;
        }
        if let Some(level) = &self.log_level {
            opts.log_level = level.clone();
        } else if self.verbose {
            opts.log_level = s!("debug");
        }
        Ok(opts)
    }
}

/// Prints per-page counts to stdout.
struct StdoutProgress;

impl Progress for StdoutProgress {
    fn begin(&mut self, total: usize) {
        println!("Parsing {total} page(s)...");
    }
    fn log(&mut self, msg: &str) {
        println!("  {msg}");
    }
    fn item_done(&mut self, label: &str, found: usize, extracted: usize) {
        println!("  {label}: {found} event(s) found, {extracted} extracted");
    }
    fn finish(&mut self, matches: usize) {
        println!("Generated {matches} match entries");
    }
}

pub fn run(args: Args) -> Result<()> {
    let opts = args.options()?;
    log::init(&opts.log_level, opts.log_file.as_deref())?;

    let now = truncate_to_seconds(args.now.unwrap_or_else(|| Local::now().naive_local()));
    let mut progress = StdoutProgress;
    let out = runner::run_files(&args.inputs, &opts.scrape, now, Some(&mut progress))?;

    let s = &out.summary;
    println!(
        "Total: {} found, {} extracted, {} failed, {} skipped",
        s.found, s.extracted, s.failed, s.skipped
    );

    let path = file::write_export(&opts.export, &out.matches)?;
    println!("Wrote {}", path.display());
    Ok(())
}
