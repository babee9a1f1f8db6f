use std::fmt::Debug;
use std::sync::Arc;
use anyhow::Result;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, Level};

use crate::config::{
    DebugLoggerConfig, DebugLoggerConfigBuilder, DEFAULT_INDENT, DEFAULT_LEVEL,
    DEFAULT_LOGGER_NAME, DEFAULT_WIDTH,
};
use crate::destination::Destination;
use crate::handler::StreamHandler;
use crate::pretty::PrettyPrinter;

lazy_static! {
    static ref DEFAULT_LOGGER: DebugLogger = get_debug_logger(DEFAULT_LOGGER_NAME, None);
}

/// The underlying sink object of a [`DebugLogger`].
///
/// Every record at or below the logger's level is handed to each attached
/// handler, in attach order. Handlers stay attached for the lifetime of the
/// logger; there is no way to detach one.
pub struct Logger {
    name: String,
    level: LevelFilter,
    handlers: RwLock<Vec<Arc<StreamHandler>>>,
}

impl Logger {
    pub fn new(name: impl Into<String>, level: LevelFilter) -> Self {
        Self {
            name: name.into(),
            level,
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn add_handler(&self, handler: Arc<StreamHandler>) {
        debug!(logger = %self.name, destination = handler.kind(), "attaching handler");
        self.handlers.write().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Emits `message` to every handler if `level` is enabled.
    ///
    /// The first handler failure is returned and the remaining handlers are
    /// skipped for this record.
    pub fn log(&self, level: Level, message: &str) -> Result<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }
        let handlers = self.handlers.read().clone();
        for handler in handlers.iter() {
            handler.emit(&self.name, message)?;
        }
        Ok(())
    }
}

impl Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("handlers", &*self.handlers.read())
            .finish()
    }
}

/// A named debug logger bundled with its sink, its handler and a
/// pretty-printer.
///
/// Clones share the same sink. Each call to [`get_debug_logger`] builds a new
/// one, even when the name has been used before.
#[derive(Debug, Clone)]
pub struct DebugLogger {
    logger: Arc<Logger>,
    handler: Arc<StreamHandler>,
    printer: PrettyPrinter,
}

impl DebugLogger {
    pub fn from_config(config: DebugLoggerConfig) -> Self {
        let logger = Arc::new(Logger::new(config.name, config.level));
        let handler = Arc::new(StreamHandler::new(config.destination));
        logger.add_handler(Arc::clone(&handler));

        Self {
            logger,
            handler,
            printer: PrettyPrinter::new(config.indent).with_width(config.width),
        }
    }

    pub fn name(&self) -> &str {
        self.logger.name()
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn handler(&self) -> &Arc<StreamHandler> {
        &self.handler
    }

    pub fn printer(&self) -> &PrettyPrinter {
        &self.printer
    }

    /// Writes `message` as one line at DEBUG.
    pub fn log(&self, message: impl AsRef<str>) -> Result<()> {
        self.logger.log(Level::DEBUG, message.as_ref())
    }

    pub fn log_at(&self, level: Level, message: impl AsRef<str>) -> Result<()> {
        self.logger.log(level, message.as_ref())
    }

    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log_at(Level::INFO, message)
    }

    pub fn warn(&self, message: impl AsRef<str>) -> Result<()> {
        self.log_at(Level::WARN, message)
    }

    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log_at(Level::ERROR, message)
    }

    /// Pretty-prints `value` and logs the result at DEBUG.
    pub fn pp<T: Debug + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(self.printer.pformat(value))
    }

    /// Like [`DebugLogger::pp`], rendering `value` as indented JSON.
    pub fn pp_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(self.printer.pformat_json(value)?)
    }
}

/// Creates a debug logger named `name` writing to `destination` (stderr when
/// `None`).
///
/// ```
/// use deboogie::{get_debug_logger, MemoryStream};
///
/// let out = MemoryStream::new();
/// let debug = get_debug_logger("boogie", Some(out.clone().into()));
/// debug.log("Git yer gittin it on on and boogie!").unwrap();
/// assert_eq!(out.contents(), "Git yer gittin it on on and boogie!\n");
/// ```
pub fn get_debug_logger(
    name: impl Into<String>,
    destination: Option<Destination>,
) -> DebugLogger {
    DebugLogger::from_config(DebugLoggerConfig {
        name: name.into(),
        destination: destination.unwrap_or_default(),
        level: DEFAULT_LEVEL,
        indent: DEFAULT_INDENT,
        width: DEFAULT_WIDTH,
    })
}

/// Creates a debug logger from a builder, validating it first.
pub fn build_debug_logger(builder: DebugLoggerConfigBuilder) -> Result<DebugLogger> {
    Ok(DebugLogger::from_config(builder.build()?))
}

/// A debug logger that discards everything written to it.
pub fn null_debug_logger(name: impl Into<String>) -> DebugLogger {
    get_debug_logger(name, Some(Destination::Null))
}

/// Process-wide logger named `deboogie`, writing to stderr.
///
/// Created on first use and kept for the rest of the process.
pub fn default_logger() -> DebugLogger {
    DEFAULT_LOGGER.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::{self, Write};
    use crate::destination::MemoryStream;

    fn capture(name: &str) -> (DebugLogger, MemoryStream) {
        let out = MemoryStream::new();
        (get_debug_logger(name, Some(out.clone().into())), out)
    }

    #[test]
    fn test_log_writes_message_line() -> Result<()> {
        let (debug, out) = capture("boogie");
        debug.log("Git yer gittin it on on and boogie!")?;
        assert_eq!(out.lines(), vec!["Git yer gittin it on on and boogie!"]);
        Ok(())
    }

    #[test]
    fn test_same_name_gives_distinct_sinks() -> Result<()> {
        let (debug, out) = capture("boogie");
        let (debug_two, out_two) = capture("boogie");

        assert!(!Arc::ptr_eq(debug.logger(), debug_two.logger()));
        assert_eq!(debug.name(), debug_two.name());

        debug.log("Hit me one time!  OW!")?;
        assert_eq!(out.lines(), vec!["Hit me one time!  OW!"]);
        assert!(out_two.is_empty());
        Ok(())
    }

    #[test]
    fn test_clone_shares_sink() {
        let (debug, _) = capture("boogie");
        let cloned = debug.clone();
        assert!(Arc::ptr_eq(debug.logger(), cloned.logger()));
        assert!(Arc::ptr_eq(debug.handler(), cloned.handler()));
    }

    #[test]
    fn test_pp_short_value_is_one_line() -> Result<()> {
        let (debug, out) = capture("boogie");
        debug.pp(&vec![("handler", 1)])?;
        assert_eq!(out.contents(), "[(\"handler\", 1)]\n");
        Ok(())
    }

    #[test]
    fn test_pp_long_value_uses_indent_of_two() -> Result<()> {
        let (debug, out) = capture("boogie");
        assert_eq!(debug.printer().indent(), 2);
        assert_eq!(debug.printer().width(), 80);

        debug.pp(&vec![("handler", 1_000_000_000_000u64); 4])?;
        let entry = "  (\n    \"handler\",\n    1000000000000,\n  ),\n";
        assert_eq!(out.contents(), format!("[\n{}]\n", entry.repeat(4)));
        Ok(())
    }

    #[test]
    fn test_printer_follows_config() -> Result<()> {
        let out = MemoryStream::new();
        let debug = build_debug_logger(
            DebugLoggerConfigBuilder::new()
                .with_name("narrow")
                .with_destination(out.clone().into())
                .with_indent(1)
                .with_width(5),
        )?;

        debug.pp(&(1, 2))?;
        assert_eq!(debug.printer().width(), 5);
        assert_eq!(out.contents(), "(\n 1,\n 2,\n)\n");
        Ok(())
    }

    #[test]
    fn test_pp_json() -> Result<()> {
        let (debug, out) = capture("boogie");
        let mut map = BTreeMap::new();
        map.insert("x", 3);
        debug.pp_json(&map)?;
        assert_eq!(out.contents(), "{\n  \"x\": 3\n}\n");
        Ok(())
    }

    #[test]
    fn test_levels_above_threshold_are_dropped() -> Result<()> {
        let out = MemoryStream::new();
        let debug = build_debug_logger(
            DebugLoggerConfigBuilder::new()
                .with_name("picky")
                .with_destination(out.clone().into())
                .with_level(Level::WARN),
        )?;

        debug.log("debug is dropped")?;
        debug.info("info is dropped")?;
        debug.warn("warn passes")?;
        debug.error("error passes")?;
        debug.log_at(Level::TRACE, "trace is dropped")?;

        assert_eq!(out.lines(), vec!["warn passes", "error passes"]);
        Ok(())
    }

    #[test]
    fn test_default_level_drops_trace_only() -> Result<()> {
        let (debug, out) = capture("boogie");
        assert_eq!(debug.logger().level(), LevelFilter::DEBUG);
        assert!(!debug.logger().is_enabled(Level::TRACE));
        debug.log_at(Level::TRACE, "too chatty")?;
        debug.info("kept")?;
        assert_eq!(out.lines(), vec!["kept"]);
        Ok(())
    }

    #[test]
    fn test_extra_handler_receives_records() -> Result<()> {
        let (debug, out) = capture("boogie");
        let extra = MemoryStream::new();
        debug.logger().add_handler(Arc::new(StreamHandler::new(extra.clone().into())));

        debug.log("twice")?;
        assert_eq!(debug.logger().handler_count(), 2);
        assert_eq!(out.lines(), vec!["twice"]);
        assert_eq!(extra.lines(), vec!["twice"]);
        Ok(())
    }

    #[test]
    fn test_null_logger_discards() -> Result<()> {
        let debug = null_debug_logger("quiet");
        debug.log("nothing")?;
        debug.pp(&(1, 2, 3))?;
        assert_eq!(debug.handler().kind(), "null");
        Ok(())
    }

    #[test]
    fn test_default_logger_is_shared() {
        let first = default_logger();
        let second = default_logger();
        assert!(Arc::ptr_eq(first.logger(), second.logger()));
        assert_eq!(first.name(), "deboogie");
        assert_eq!(first.handler().kind(), "stderr");
    }

    #[test]
    fn test_write_failure_reaches_caller() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let debug = get_debug_logger("broken", Some(Destination::writer(Closed)));
        let err = debug.log("lost").unwrap_err();
        assert!(err.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_debug_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DebugLogger>();
    }
}
