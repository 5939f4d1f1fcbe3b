//! Command-line and environment configuration for the server.

use clap::Parser;
use std::path::PathBuf;

/// Local web tool that runs the APIA "Cerere Unică de Plată" extraction and
/// serves the generated spreadsheets.
#[derive(Parser, Debug, Clone)]
#[command(name = "cup-etl", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "CUP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "CUP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory receiving the uploaded PDFs and the generated spreadsheets.
    #[arg(long, env = "CUP_OUTPUT_DIR", default_value = "generated_files")]
    pub output_dir: PathBuf,

    /// Program that extracts the tables from a PDF.
    ///
    /// It is called as `<processor> <processor-args...> <pdf> <year>` and must
    /// print `{"tables": ..., "plan": ..., "stats": [rows, crops, categories]}`.
    #[arg(long, env = "CUP_PROCESSOR", default_value = "python3")]
    pub processor: String,

    /// Leading arguments passed to the processor program.
    #[arg(
        long = "processor-arg",
        env = "CUP_PROCESSOR_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "lumber5_cli.py"
    )]
    pub processor_args: Vec<String>,

    /// Minutes a session may stay unused before it is forgotten.
    #[arg(long, env = "CUP_SESSION_IDLE_MINUTES", default_value_t = 240)]
    pub session_idle_minutes: u64,

    /// Do not open a browser window on startup.
    #[arg(long, env = "CUP_NO_BROWSER")]
    pub no_browser: bool,
}

impl Config {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_setup() {
        let config = Config::try_parse_from(["cup-etl"]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.output_dir, PathBuf::from("generated_files"));
        assert_eq!(config.processor_args, vec!["lumber5_cli.py".to_string()]);
        assert_eq!(config.url(), "http://127.0.0.1:8080");
        assert_eq!(config.session_idle_minutes, 240);
    }

    #[test]
    fn processor_args_repeat() {
        let config = Config::try_parse_from([
            "cup-etl",
            "--processor",
            "sh",
            "--processor-arg",
            "-c",
            "--processor-arg",
            "run.sh",
            "--no-browser",
        ])
        .unwrap();
        assert_eq!(config.processor, "sh");
        assert_eq!(config.processor_args, vec!["-c", "run.sh"]);
        assert!(config.no_browser);
    }
}
