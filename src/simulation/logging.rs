//! Logging and tracing configuration
//!
//! Diagnostic logging for the simulator. This is separate from the event log,
//! which is a data product of the run rather than a trace of it.

use std::io;
use thiserror::Error;
use tracing::{debug, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::ParseError,
    fmt::{self, format::FmtSpan},
    layer::{Layered, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive did not parse
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber is already installed
    #[error("Failed to install log subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Keeps background log writers alive; drop it at the end of `main`
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json_format: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "shop-forecasting".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable daily rolling file logging into `directory`
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.env_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn console_layer(&self) -> BoxedLayer {
        if self.json_format {
            fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(self.span_events())
                .boxed()
        } else {
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_target(false)
                .with_span_events(self.span_events())
                .boxed()
        }
    }

    /// Files are always JSON so they can be post-processed
    fn file_layer(&self) -> Option<(BoxedLayer, WorkerGuard)> {
        if !self.log_to_file {
            return None;
        }
        let log_dir = self.log_directory.as_deref().unwrap_or("logs");
        let (writer, guard) = non_blocking(rolling::daily(log_dir, &self.log_file_prefix));
        let layer = fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(self.span_events())
            .boxed();
        Some((layer, guard))
    }

    /// Install the global tracing subscriber
    ///
    /// Fails if a subscriber is already installed. Keep the returned guard
    /// alive for as long as file logging should keep flushing.
    pub fn init(self) -> Result<LoggingGuard, LoggingError> {
        let mut layers = vec![self.console_layer()];
        let mut guards = Vec::new();
        if let Some((layer, guard)) = self.file_layer() {
            layers.push(layer);
            guards.push(guard);
        }

        Registry::default().with(self.env_filter()?).with(layers).try_init()?;

        debug!(config = ?self, "Logging initialized");
        Ok(LoggingGuard { _guards: guards })
    }

    /// Initialize logging for development (pretty console output)
    pub fn init_dev() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }

    /// Initialize logging for production (JSON format with file logging)
    pub fn init_prod(log_dir: impl Into<String>) -> Result<LoggingGuard, LoggingError> {
        Self::new()
            .with_level(Level::INFO)
            .with_json_format()
            .with_file_logging(log_dir)
            .without_ansi()
            .init()
    }

    /// Initialize logging for testing (minimal output)
    pub fn init_test() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }

    /// Initialize verbose logging (INFO level with span events)
    pub fn init_verbose() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::INFO).with_span_events().init()
    }

    /// Initialize debug logging (DEBUG level with span events)
    pub fn init_debug() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }
}

/// Emit a log event tagged with `component = "simulation"`
///
/// ```ignore
/// sim_event!(debug, "Operation started", operation = %id, hours = 2.5);
/// ```
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr $(, $($field:tt)+)?) => {
        tracing::$level!(component = "simulation", $($($field)+,)? message = $message)
    };
}

/// Open an INFO span tagged with `component = "performance"`
#[macro_export]
macro_rules! perf_span {
    ($name:expr $(, $($field:tt)+)?) => {
        tracing::info_span!($name, component = "performance" $(, $($field)+)?)
    };
}
