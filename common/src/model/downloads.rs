use serde::{Deserialize, Serialize};

/// What the page needs to decide whether to show the download buttons.
///
/// `available` is only true when both artifacts are recorded for the session
/// and both still exist on disk. When it is false the file names are `None`
/// so the page never links to a stale file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadsView {
    pub available: bool,
    pub tables_file: Option<String>,
    pub plan_file: Option<String>,
    /// Directory where uploads and generated files are kept.
    pub output_dir: String,
}

impl DownloadsView {
    pub fn hidden(output_dir: String) -> Self {
        Self {
            available: false,
            tables_file: None,
            plan_file: None,
            output_dir,
        }
    }
}
