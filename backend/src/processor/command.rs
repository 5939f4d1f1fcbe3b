use super::{ProcessError, ProcessOutput, Processor};
use cup_common::model::stats::ProcessingStats;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What the external program prints on stdout when it succeeds.
#[derive(Deserialize)]
struct CommandReport {
    tables: PathBuf,
    plan: PathBuf,
    stats: ProcessingStats,
}

/// Runs the extraction as a child process.
///
/// The program is invoked as `<program> <args...> <pdf_path> <year>` with the
/// PDF's directory as working directory, so outputs land next to the copied
/// upload. Relative paths in the report are resolved against that directory.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    program: String,
    args: Vec<String>,
}

impl CommandProcessor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Processor for CommandProcessor {
    fn process(&self, pdf_path: &Path, year: &str) -> Result<ProcessOutput, ProcessError> {
        let work_dir = pdf_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        debug!(
            "Running {} {:?} on {} ({})",
            self.program,
            self.args,
            pdf_path.display(),
            year
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(pdf_path)
            .arg(year)
            .current_dir(work_dir)
            .output()
            .map_err(|source| ProcessError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProcessError::Failed(if stderr.is_empty() {
                format!("procesorul s-a oprit cu {}", output.status)
            } else {
                stderr
            }));
        }

        let report: CommandReport = serde_json::from_slice(&output.stdout)
            .map_err(|e| ProcessError::InvalidOutput(e.to_string()))?;

        Ok(ProcessOutput {
            tables_path: resolve(work_dir, report.tables),
            plan_path: resolve(work_dir, report.plan),
            stats: report.stats,
        })
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shell(script: &str) -> CommandProcessor {
        CommandProcessor::new("sh", vec!["-c".into(), script.into(), "sh".into()])
    }

    #[test]
    fn reads_report_and_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("cerere.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let processor = shell(
            r#"test "$2" = "2024" || exit 3
echo '{"tables": "output_tables.xlsx", "plan": "/abs/Plan_de_fertilizare.xlsx", "stats": [120, 5, 3]}'"#,
        );
        let out = processor.process(&pdf, "2024").unwrap();

        assert_eq!(out.tables_path, dir.path().join("output_tables.xlsx"));
        assert_eq!(out.plan_path, PathBuf::from("/abs/Plan_de_fertilizare.xlsx"));
        assert_eq!(
            out.stats,
            ProcessingStats {
                rows_parsed: 120,
                crop_types: 5,
                categories: 3
            }
        );
    }

    #[test]
    fn runs_inside_pdf_directory() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("cerere.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let processor = shell(
            r#"touch made_here.xlsx
echo '{"tables": "made_here.xlsx", "plan": "made_here.xlsx", "stats": [0, 0, 0]}'"#,
        );
        let out = processor.process(&pdf, "2024").unwrap();

        assert!(out.tables_path.is_file());
    }

    #[test]
    fn non_zero_exit_reports_stderr() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("cerere.pdf");

        let err = shell("echo 'tabelul nu a fost găsit' >&2; exit 1")
            .process(&pdf, "2024")
            .unwrap_err();

        assert!(matches!(err, ProcessError::Failed(_)));
        assert_eq!(err.to_string(), "tabelul nu a fost găsit");
    }

    #[test]
    fn garbage_stdout_is_invalid_output() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("cerere.pdf");

        let err = shell("echo gata").process(&pdf, "2024").unwrap_err();

        assert!(matches!(err, ProcessError::InvalidOutput(_)));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("cerere.pdf");

        let err = CommandProcessor::new("/nonexistent/cup-processor", vec![])
            .process(&pdf, "2024")
            .unwrap_err();

        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
