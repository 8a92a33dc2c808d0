//! Forwarding of the crate's `log` records to a host-provided logger.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};

use crate::AegisConfig;

/// Trait representing a logger that can log messages at various levels.
///
/// This trait should be implemented by any logger that wants to receive log messages.
/// It is exported via `UniFFI` for use in foreign languages.
///
/// # Examples
///
/// Implementing the `Logger` trait:
///
/// ```rust
/// use aegiskit_core::logger::{Logger, LogLevel};
///
/// struct MyLogger;
///
/// impl Logger for MyLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{:?}] {}", level, message);
///     }
/// }
/// ```
///
/// ## Kotlin
///
/// ```kotlin
/// object AegisKitLoggerBridge : Logger {
///     override fun log(level: LogLevel, message: String) {
///         Log.println(level.toAndroidPriority(), "AegisKit", message)
///     }
/// }
///
/// setLogger(AegisKitLoggerBridge) // Call this only once!!!
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    ///
    /// # Arguments
    ///
    /// * `level` - The severity level of the log message.
    /// * `message` - The log message to be recorded.
    fn log(&self, level: LogLevel, message: String);
}

/// Enumeration of possible log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Designates very low priority, often extremely detailed messages.
    Trace,
    /// Designates lower priority debugging information.
    Debug,
    /// Designates informational messages that highlight the progress of the application.
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

/// Forwards `log` records to the user-provided [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) || !should_forward(record.level(), record.module_path()) {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

/// Debug and trace records are only forwarded when they come from this crate; dependencies
/// are too chatty at those levels.
fn should_forward(level: log::Level, module_path: Option<&str>) -> bool {
    let is_from_aegiskit = module_path.is_some_and(|path| path.starts_with("aegiskit"));
    let is_debug_or_trace = level == log::Level::Debug || level == log::Level::Trace;
    is_from_aegiskit || !is_debug_or_trace
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Set once [`apply_config`] has chosen the max level; [`set_logger`] must not override it.
static LEVEL_CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Sets the global logger.
///
/// Provide your own implementation of the [`Logger`] trait. Call this once, before any
/// logging occurs. Subsequent calls keep the first logger. A level chosen earlier through
/// [`apply_config`] is kept; otherwise every level is enabled.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        println!("Logger already set");
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

/// Applies the configuration's logging flag to the global `log` level.
///
/// With logging disabled only errors are emitted. May be called before or after
/// [`set_logger`].
pub fn apply_config(config: &AegisConfig) {
    LEVEL_CONFIGURED.store(true, Ordering::Release);
    log::set_max_level(config.log_level_filter());
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    if !LEVEL_CONFIGURED.load(Ordering::Acquire) {
        log::set_max_level(log::LevelFilter::Trace);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(log_level(log::Level::Error), LogLevel::Error);
        assert_eq!(log_level(log::Level::Trace), LogLevel::Trace);
    }

    #[test]
    fn test_debug_records_from_dependencies_are_dropped() {
        assert!(should_forward(log::Level::Debug, Some("aegiskit_core::session")));
        assert!(!should_forward(log::Level::Debug, Some("hyper::proto")));
        assert!(!should_forward(log::Level::Trace, None));
        assert!(should_forward(log::Level::Warn, Some("hyper::proto")));
    }

    struct Discard;

    impl Logger for Discard {
        fn log(&self, _level: LogLevel, _message: String) {}
    }

    #[test]
    fn test_disabled_logging_survives_set_logger() {
        let config = AegisConfig {
            enable_logging: false,
            ..AegisConfig::default()
        };
        apply_config(&config);
        set_logger(Arc::new(Discard));
        assert_eq!(log::max_level(), log::LevelFilter::Error);
    }
}
