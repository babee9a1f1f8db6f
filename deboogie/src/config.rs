use anyhow::Result;
use tracing::level_filters::LevelFilter;

use crate::destination::Destination;

// Default configuration constants
pub(crate) const DEFAULT_LOGGER_NAME: &str = "deboogie";
pub(crate) const DEFAULT_INDENT: usize = 2;
pub(crate) const DEFAULT_WIDTH: usize = 80;
pub(crate) const DEFAULT_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// [`DebugLoggerConfig`] configuration for a single debug logger.
#[derive(Debug)]
pub struct DebugLoggerConfig {
    /// Name of the logger. Names are labels only, two loggers may share one.
    pub(crate) name: String,

    /// Stream every record of this logger is written to
    pub(crate) destination: Destination,

    /// Most verbose level that still gets written
    pub(crate) level: LevelFilter,

    /// Indentation width used by the pretty-printer
    pub(crate) indent: usize,

    /// Longest value the pretty-printer keeps on a single line
    pub(crate) width: usize,
}

impl DebugLoggerConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }
}

#[derive(Debug)]
pub struct DebugLoggerConfigBuilder {
    pub(crate) name: Option<String>,
    pub(crate) destination: Destination,
    pub(crate) level: LevelFilter,
    pub(crate) indent: usize,
    pub(crate) width: usize,
}

impl Default for DebugLoggerConfigBuilder {
    fn default() -> DebugLoggerConfigBuilder {
        Self {
            name: None,
            destination: Destination::default(),
            level: DEFAULT_LEVEL,
            indent: DEFAULT_INDENT,
            width: DEFAULT_WIDTH,
        }
    }
}

impl DebugLoggerConfigBuilder {
    /// Creates a new [`DebugLoggerConfigBuilder`] with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the logger
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the destination stream, stderr when never called
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Sets the most verbose level the logger writes.
    ///
    /// Records above this level (e.g. TRACE when the level is DEBUG) are dropped
    /// before they reach the destination.
    pub fn with_level(mut self, level: impl Into<LevelFilter>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the indentation width of the pretty-printer
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the line width under which values are pretty-printed on one line
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Validates the current configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_none() {
            anyhow::bail!("logger name is not set");
        }
        if self.level == LevelFilter::OFF {
            anyhow::bail!("logger level is OFF, use a null destination to discard records");
        }
        Ok(())
    }

    /// Builds the final DebugLoggerConfig
    pub fn build(self) -> Result<DebugLoggerConfig> {
        self.validate()?;

        Ok(DebugLoggerConfig {
            name: self.name.unwrap_or_default(),
            destination: self.destination,
            level: self.level,
            indent: self.indent,
            width: self.width,
        })
    }
}
