//! Configuration for the classifier and the CLI.
//!
//! Loaded from `conf/chapterize.toml` if present. Missing or invalid entries
//! fall back to defaults so an import never fails because of configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "conf/chapterize.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Spine entries whose href or declared title match any of these are
    /// skipped before their content is read.
    pub navigation_patterns: Vec<String>,
    /// Matched against the detected title and the href once a title is known.
    pub title_skip_patterns: Vec<String>,
    /// Hrefs matching this are appended to the previous chapter. Empty disables.
    pub continuation_href_pattern: String,
    pub log_level: LogLevel,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            navigation_patterns: default_navigation_patterns(),
            title_skip_patterns: default_title_skip_patterns(),
            continuation_href_pattern: default_continuation_href_pattern(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_navigation_patterns() -> Vec<String> {
    [
        r"(?i)(^|[^a-z])toc([^a-z]|$)",
        r"(?i)table[\s_-]*of[\s_-]*contents",
        r"(?i)(^|[^a-z])nav([^a-z]|$)",
        r"(?i)(^|[^a-z])(front|back)?cover(page|s)?([^a-z]|$)",
        r"(?i)title[\s_-]*page",
        r"(?i)copyright",
        r"(?i)(^|[^a-z])legal([^a-z]|$)",
        r"(?i)colou?r[\s_-]*inserts?",
        r"(?i)newsletter",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_title_skip_patterns() -> Vec<String> {
    [
        r"(?i)^contents$",
        r"(?i)table[\s_-]*of[\s_-]*contents",
        r"(?i)(^|[^a-z])toc([^a-z]|$)",
        r"(?i)colou?r[\s_-]*inserts?",
        r"(?i)title[\s_-]*page",
        r"(?i)copyright",
        r"(?i)^credits$",
        r"(?i)newsletter",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_continuation_href_pattern() -> String {
    r"(?i)^text/".to_string()
}

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> ExtractConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded config");
            data
        }
        Err(err) => {
            debug!(
                path = %path.display(),
                "No config file, using defaults: {err}"
            );
            return ExtractConfig::default();
        }
    };

    match toml::from_str::<ExtractConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            ExtractConfig::default()
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: ExtractConfig = toml::from_str(
            r#"
            continuation_href_pattern = ""
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert!(cfg.continuation_href_pattern.is_empty());
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.navigation_patterns, default_navigation_patterns());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config(Path::new("/nonexistent/chapterize.toml"));
        assert_eq!(cfg.continuation_href_pattern, r"(?i)^text/");
        assert_eq!(cfg.log_level, LogLevel::Info);
    }

    #[test]
    fn invalid_toml_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "log_level = [").unwrap();
        let cfg = load_config(&path);
        assert_eq!(cfg.title_skip_patterns, default_title_skip_patterns());
    }
}
