//! User-visible status texts. The tool is used by Romanian farm consultants,
//! so every message shown on the page is in Romanian.

use cup_common::model::stats::ProcessingStats;
use std::path::Path;

pub const MISSING_PDF: &str = "⚠️ Vă rugăm să încărcați un fișier PDF.";
pub const MISSING_YEAR: &str = "⚠️ Introduceți anul cererii.";
pub const ARTIFACT_UNAVAILABLE: &str = "Fișierul nu este disponibil.";

/// Summary shown after a successful run.
pub fn completed(tables: &Path, plan: &Path, stats: &ProcessingStats) -> String {
    format!(
        "✅ Procesare completă!\n\
         - Fișier tabel: {}\n\
         - Fișier plan: {}\n\
         - Rânduri parse: {}\n\
         - Culturi: {}\n\
         - Categorii: {}",
        base_name(tables),
        base_name(plan),
        stats.rows_parsed,
        stats.crop_types,
        stats.categories
    )
}

/// Every processing failure collapses into the same format.
pub fn failed(error: &dyn std::fmt::Display) -> String {
    format!("❌ Eroare la procesare: {}", error)
}

/// Last path component as a display string, or the whole path when it has none.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
