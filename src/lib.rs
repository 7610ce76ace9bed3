// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod normalize;
pub mod specs;

pub mod aggregate;
pub mod data;
pub mod file;
pub mod progress;
pub mod runner;

#[cfg(feature = "cli")]
pub mod cli;

pub use aggregate::{Aggregator, MatchMap};
pub use data::{MatchRecord, OddsEntry, RawEvent};
pub use error::{Result, ScrapeError};
pub use runner::{RunSummary, run_documents};
