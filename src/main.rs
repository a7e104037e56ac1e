mod cli;
mod converter;

use anyhow::{Context, Result};
use chapterize::config::{self, ExtractConfig, LogLevel};
use chapterize::Classifier;
use clap::Parser;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

type ReloadHandle = reload::Handle<EnvFilter, Registry>;

/// Level used until the config file has been read.
const STARTUP_LEVEL: &str = "info";

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let reload_handle = init_tracing();
    let config = load_config(&cli.config, &reload_handle);

    let classifier = Classifier::from_config(&config)
        .with_context(|| format!("Invalid pattern in {}", cli.config.display()))?;
    converter::convert(&cli, &classifier)
}

/// Installed before the config is read so config warnings are not lost.
/// Logs go to stderr so `--info` output stays clean.
fn init_tracing() -> ReloadHandle {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STARTUP_LEVEL));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn load_config(path: &Path, handle: &ReloadHandle) -> ExtractConfig {
    let config = config::load_config(path);
    if std::env::var_os("RUST_LOG").is_none() {
        set_log_level(handle, config.log_level);
    }
    config
}

fn set_log_level(handle: &ReloadHandle, level: LogLevel) {
    let filter = EnvFilter::new(level.as_filter_str());
    if let Err(err) = handle.modify(|current| *current = filter) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        debug!(%level, "Applied log level from config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn invalid_config_warning_is_logged_then_level_applies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapterize.toml");
        std::fs::write(&path, "log_level = [").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let (filter_layer, handle) = reload::Layer::new(EnvFilter::new(STARTUP_LEVEL));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone())
                .with_filter(filter_layer),
        );

        let config = tracing::subscriber::with_default(subscriber, || {
            let config = config::load_config(&path);
            set_log_level(&handle, LogLevel::Error);
            warn!("hidden once the error level applies");
            config
        });

        assert_eq!(config.log_level, LogLevel::Info);
        let logs = captured.text();
        assert!(logs.contains("Invalid config TOML"), "{logs}");
        assert!(!logs.contains("hidden once"), "{logs}");
    }
}
