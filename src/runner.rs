// src/runner.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::aggregate::{Aggregator, MatchMap};
use crate::config::options::ScrapeOptions;
use crate::core::HtmlDoc;
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;
use crate::specs::psel;

/// Counts for one run, summed over every document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    /// Event containers located.
    pub found: usize,
    /// Containers that yielded a usable event.
    pub extracted: usize,
    /// Containers whose extraction faulted.
    pub failed: usize,
    /// Containers skipped as repeated links.
    pub duplicates: usize,
    /// Events dropped before merging (fewer than two opponents).
    pub skipped: usize,
    /// Records in the final map.
    pub matches: usize,
}

pub struct RunOutput {
    pub matches: MatchMap,
    pub summary: RunSummary,
}

/// One pipeline run over `(label, bytes)` documents, merged in the order given.
/// Fails only when a document is not text at all.
pub fn run_documents<'a, I>(
    docs: I,
    opts: &ScrapeOptions,
    now: NaiveDateTime,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunOutput>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let docs: Vec<(&str, &[u8])> = docs.into_iter().collect();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(docs.len());
    }

    let mut agg = Aggregator::new(now);
    let mut summary = RunSummary { documents: docs.len(), ..Default::default() };

    for (label, bytes) in docs {
        let doc = HtmlDoc::from_bytes(bytes)?;
        let (events, report) = psel::extract_all(&doc.root(), opts);
        logf!("{label}: {} found, {} extracted", report.found, report.extracted);

        summary.found += report.found;
        summary.extracted += report.extracted;
        summary.failed += report.failed;
        summary.duplicates += report.duplicates;
        agg.extend(&events);

        if let Some(p) = progress.as_deref_mut() {
            if report.failed > 0 {
                p.log(&format!("{label}: {} card(s) could not be read", report.failed));
            }
            p.item_done(label, report.found, report.extracted);
        }
    }

    summary.skipped = agg.skipped();
    let matches = agg.finish();
    summary.matches = matches.len();

    if let Some(p) = progress.as_deref_mut() {
        p.finish(summary.matches);
    }
    Ok(RunOutput { matches, summary })
}

/// Single in-memory page.
pub fn run_html(html: &str, opts: &ScrapeOptions, now: NaiveDateTime) -> Result<RunOutput> {
    run_documents([("<inline>", html.as_bytes())], opts, now, None)
}

/// Read saved pages from disk and run them as one batch.
pub fn run_files(
    paths: &[PathBuf],
    opts: &ScrapeOptions,
    now: NaiveDateTime,
    progress: Option<&mut dyn Progress>,
) -> Result<RunOutput> {
    if paths.is_empty() {
        return Err(ScrapeError::NoInput);
    }
    let mut loaded: Vec<(String, Vec<u8>)> = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = fs::read(path).map_err(|e| ScrapeError::io(path, e))?;
        loaded.push((label_for(path), bytes));
    }
    run_documents(
        loaded.iter().map(|(l, b)| (l.as_str(), b.as_slice())),
        opts,
        now,
        progress,
    )
}

fn label_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
