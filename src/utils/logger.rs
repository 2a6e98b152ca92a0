// src/utils/logger.rs
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use time::macros::format_description;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    registry,
    util::SubscriberInitExt,
    EnvFilter,
};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_FILE_PREFIX: &str = "i18n.log";
const DEFAULT_LEVEL: &str = "info";

/// Installs the global `tracing` subscriber for a host embedding this crate.
///
/// The library itself only emits events; nothing is printed until a host
/// calls [`LoggerBuilder::init`] (or installs its own subscriber).
#[derive(Debug)]
pub struct LoggerBuilder {
    log_dir: PathBuf,
    file_prefix: String,
    default_level: String,
    stdout: bool,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    pub fn new() -> Self {
        LoggerBuilder {
            log_dir: DEFAULT_LOG_DIR.into(),
            file_prefix: DEFAULT_FILE_PREFIX.into(),
            default_level: DEFAULT_LEVEL.into(),
            stdout: true,
        }
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    pub fn stdout(mut self, enabled: bool) -> Self {
        self.stdout = enabled;
        self
    }

    pub fn init(self) -> Result<(), Box<dyn Error>> {
        fs::create_dir_all(&self.log_dir)?;
        let file_appender = rolling::daily(&self.log_dir, &self.file_prefix);

        let time_format = LocalTime::new(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        ));

        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_timer(time_format.clone());

        let stdout_layer = self.stdout.then(|| {
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_target(true)
                .with_timer(time_format)
        });

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_level));

        registry()
            .with(filter)
            .with(file_layer)
            .with(stdout_layer)
            .try_init()?;
        Ok(())
    }
}
