use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {dir}: {source}")]
    CreateLogDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a tracing subscriber is already installed")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Keeps the non-blocking file writer flushing; drop it on shutdown.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone)]
pub struct FileLogOptions {
    pub dir: PathBuf,
    pub file_name: String,
}

impl Default for FileLogOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            file_name: "tutor.log".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: String,
    /// Daily-rolling file layer in addition to stdout when set.
    pub file: Option<FileLogOptions>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogOptions {
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(level) = std::env::var("TUTOR_LOG_LEVEL") {
            options.level = level;
        }
        let file_enabled = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        if file_enabled {
            let mut file = FileLogOptions::default();
            if let Ok(dir) = std::env::var("TUTOR_LOG_DIR") {
                file.dir = PathBuf::from(dir);
            }
            options.file = Some(file);
        }

        options
    }
}

/// Installs a stdout tracing subscriber, plus the daily-rolling file layer
/// when `options.file` is set. Returns the flush guard for the file writer.
/// Host applications embedding the engine in a larger service will usually
/// install their own subscriber instead; a second install attempt here
/// reports `LoggingError::AlreadyInstalled`.
pub fn init_tracing(options: &LogOptions) -> Result<Option<FileLogGuard>, LoggingError> {
    let env_filter =
        EnvFilter::try_new(&options.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    if let Some(ref file) = options.file {
        std::fs::create_dir_all(&file.dir).map_err(|source| LoggingError::CreateLogDir {
            dir: file.dir.clone(),
            source,
        })?;
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &file.dir, &file.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .with(file_layer)
            .try_init()?;

        return Ok(Some(FileLogGuard { _guard: guard }));
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()?;

    Ok(None)
}
