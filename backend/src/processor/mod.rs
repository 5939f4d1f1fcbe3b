//! The extraction routine that turns an uploaded PDF into two spreadsheets.
//!
//! The server never parses the PDF itself. It hands the copied file and the
//! requested year to a [`Processor`], which writes the tables spreadsheet and
//! the fertilization plan and reports how much it found. The production
//! implementation is [`command::CommandProcessor`]; tests plug in fakes.

pub mod command;

use cup_common::model::stats::ProcessingStats;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Paths and counts produced by one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub tables_path: PathBuf,
    pub plan_path: PathBuf,
    pub stats: ProcessingStats,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("nu s-a putut porni procesorul '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Failed(String),

    #[error("răspuns invalid de la procesor: {0}")]
    InvalidOutput(String),
}

pub trait Processor: Send + Sync {
    /// Extracts the tables out of `pdf_path` for the application year `year`.
    ///
    /// Blocking; callers run it off the async executor.
    fn process(&self, pdf_path: &Path, year: &str) -> Result<ProcessOutput, ProcessError>;
}
