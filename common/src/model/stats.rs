use serde::{Deserialize, Serialize};

/// Summary counts reported by the external processor after a successful run.
///
/// On the wire the processor reports these as a three element array
/// `[rows_parsed, crop_types, categories]`, so the struct (de)serializes
/// as a tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(u64, u64, u64)", into = "(u64, u64, u64)")]
pub struct ProcessingStats {
    /// Number of table rows parsed out of the PDF.
    pub rows_parsed: u64,
    /// Number of distinct crop types found.
    pub crop_types: u64,
    /// Number of distinct categories found.
    pub categories: u64,
}

impl From<(u64, u64, u64)> for ProcessingStats {
    fn from((rows_parsed, crop_types, categories): (u64, u64, u64)) -> Self {
        Self {
            rows_parsed,
            crop_types,
            categories,
        }
    }
}

impl From<ProcessingStats> for (u64, u64, u64) {
    fn from(stats: ProcessingStats) -> Self {
        (stats.rows_parsed, stats.crop_types, stats.categories)
    }
}
