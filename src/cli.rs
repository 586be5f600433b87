//! Command-line arguments, runtime configuration and log setup.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;

use crate::autosave::{AUTOSAVE_DELAY, STATUS_DISPLAY};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "stepform",
    version,
    about = "Multi-step application form with autosave and review"
)]
pub struct Cli {
    /// Server hosting the autosave and submission endpoints
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the autosave endpoint, relative to the base URL
    #[arg(long, default_value = "/autosave")]
    pub autosave_path: String,

    /// Path of the submission endpoint, relative to the base URL
    #[arg(long, default_value = "/submit")]
    pub submit_path: String,

    /// Quiet period after the last edit before a draft is saved
    #[arg(long, default_value = "2s")]
    pub autosave_delay: humantime::Duration,

    /// How long autosave status messages stay visible
    #[arg(long, default_value = "5s")]
    pub status_duration: humantime::Duration,

    /// JSON draft to pre-fill the form from
    #[arg(long)]
    pub prefill: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Settings the application runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub autosave_path: String,
    pub submit_path: String,
    pub autosave_delay: Duration,
    pub status_duration: Duration,
    pub prefill: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            autosave_path: "/autosave".to_string(),
            submit_path: "/submit".to_string(),
            autosave_delay: AUTOSAVE_DELAY,
            status_duration: STATUS_DISPLAY,
            prefill: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Full URL of the autosave endpoint.
    pub fn autosave_url(&self) -> String {
        join_url(&self.base_url, &self.autosave_path)
    }

    /// Full URL of the submission endpoint.
    pub fn submit_url(&self) -> String {
        join_url(&self.base_url, &self.submit_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Build a [`Config`] from CLI arguments.
pub fn build_config(args: &Cli) -> Config {
    Config {
        base_url: args.base_url.clone(),
        autosave_path: args.autosave_path.clone(),
        submit_path: args.submit_path.clone(),
        autosave_delay: Duration::from(args.autosave_delay),
        status_duration: Duration::from(args.status_duration),
        prefill: args.prefill.clone(),
        log_file: args.log_file.clone(),
    }
}

/// Sends `tracing` output to `path`. Without a path nothing is logged: the
/// terminal belongs to the UI.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stepform").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_config_default() {
        assert_eq!(build_config(&parse(&[])), Config::default());
    }

    #[test]
    fn default_urls() {
        let config = Config::default();
        assert_eq!(config.autosave_url(), "http://127.0.0.1:5000/autosave");
        assert_eq!(config.submit_url(), "http://127.0.0.1:5000/submit");
    }

    #[test]
    fn durations_parse_with_units() {
        let config = build_config(&parse(&[
            "--autosave-delay",
            "500ms",
            "--status-duration",
            "1m",
        ]));
        assert_eq!(config.autosave_delay, Duration::from_millis(500));
        assert_eq!(config.status_duration, Duration::from_secs(60));
    }

    #[test]
    fn bad_duration_is_rejected() {
        let result =
            Cli::try_parse_from(["stepform", "--autosave-delay", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn url_join_handles_slashes() {
        let config = build_config(&parse(&[
            "--base-url",
            "https://apply.example.org/",
            "--submit-path",
            "api/submit",
        ]));
        assert_eq!(config.submit_url(), "https://apply.example.org/api/submit");
    }

    #[test]
    fn paths_are_optional() {
        let config = build_config(&parse(&["--prefill", "draft.json", "--log-file", "run.log"]));
        assert_eq!(config.prefill, Some(PathBuf::from("draft.json")));
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
    }
}
