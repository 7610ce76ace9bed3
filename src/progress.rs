// src/progress.rs
/// Lightweight progress reporting for a pipeline run.
/// Frontends (the CLI) implement this to surface counts to users.
pub trait Progress {
    /// Called at the start with the number of documents.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each document with its label, containers found and events kept.
    fn item_done(&mut self, _label: &str, _found: usize, _extracted: usize) {}

    /// Called at the end with the merged match count.
    fn finish(&mut self, _matches: usize) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
