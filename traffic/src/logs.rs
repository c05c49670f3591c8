//! Pipeline logging.
//!
//! Library code reports progress through [`log_info`], [`log_success`] and
//! [`log_warning`], which emit `tracing` events under the `traffic` target.
//! Nothing is printed unless a subscriber is installed; [`init`] installs a
//! compact stderr one.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Log target used by every library message.
pub const TARGET: &str = "traffic";

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV: &str = "TRAFFIC_LOG";

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
}

impl LogLevel {
    fn as_level(self) -> Level {
        match self {
            LogLevel::Info | LogLevel::Success => Level::INFO,
            LogLevel::Warning => Level::WARN,
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Indentation level (for nested logs)
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Text carried by the emitted event.
    pub fn render(&self) -> String {
        let indent = "   ".repeat(self.indent as usize);
        match self.level {
            LogLevel::Success => format!("{}✓ {}", indent, self.message),
            LogLevel::Warning => format!("{}⚠️  {}", indent, self.message),
            LogLevel::Info => format!("{}{}", indent, self.message),
        }
    }
}

/// Emit an entry as a `tracing` event.
pub fn emit(entry: LogEntry) {
    let text = entry.render();
    if entry.level.as_level() == Level::WARN {
        tracing::warn!(target: TARGET, "{}", text);
    } else {
        tracing::info!(target: TARGET, "{}", text);
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    emit(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    emit(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    emit(LogEntry::warning(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    emit(LogEntry::info(msg).with_indent(indent));
}

// =============================================================================
// Subscriber setup
// =============================================================================

/// Install a stderr subscriber. A second call is a no-op.
pub fn init(level: LevelFilter) {
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Install the stderr subscriber at the level named by `TRAFFIC_LOG`
/// (`error`, `warn`, `info`, `debug`, `trace`, `off`), `info` by default.
pub fn init_from_env() {
    init(parse_level(std::env::var(LOG_ENV).ok().as_deref()));
}

fn parse_level(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|s| s.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO)
}
