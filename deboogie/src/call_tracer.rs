use std::fmt::Debug;
use std::sync::Arc;
use anyhow::Result;
use tracing::trace;

use crate::logger::{default_logger, DebugLogger};
use crate::pretty::{pretty_debug, PrettyPrinter};

/// Invocation-start record: which function is called and with what.
///
/// Positional and keyword style arguments are both carried by `args`, the
/// packed argument value handed to the wrapped function (a tuple, a struct,
/// or a tuple of positionals and a name to value map).
#[derive(Debug)]
pub struct CallRecord<'a> {
    pub function: &'a str,
    pub args: &'a dyn Debug,
}

/// Invocation-end record: the value a call returned.
#[derive(Debug)]
pub struct ReturnRecord<'a> {
    pub function: &'a str,
    pub value: &'a dyn Debug,
}

/// Maps a call record to a line, or `None` to log nothing.
pub type InputFormatter = Arc<dyn Fn(&CallRecord<'_>) -> Option<String> + Send + Sync>;

/// Maps a return record to a line, or `None` to log nothing.
pub type OutputFormatter = Arc<dyn Fn(&ReturnRecord<'_>) -> Option<String> + Send + Sync>;

/// Labels the whole call record as `input` and pretty-prints it.
pub fn default_input_formatter(record: &CallRecord<'_>) -> Option<String> {
    Some(pretty_debug(&PrettyPrinter::default(), "input", record))
}

/// Labels the returned value as `output` and pretty-prints it.
pub fn default_output_formatter(record: &ReturnRecord<'_>) -> Option<String> {
    Some(pretty_debug(&PrettyPrinter::default(), "output", record.value))
}

pub fn suppress_input(_record: &CallRecord<'_>) -> Option<String> {
    None
}

pub fn suppress_output(_record: &ReturnRecord<'_>) -> Option<String> {
    None
}

/// Wraps functions so that their arguments are logged before each call and
/// their return value after it.
///
/// The input side (formatter + sink) and the output side are independent.
/// A failing call is propagated untouched and leaves no output record.
///
/// ```
/// use deboogie::{get_debug_logger, CallTracer, MemoryStream};
///
/// let out = MemoryStream::new();
/// let sink = get_debug_logger("calls", Some(out.clone().into()));
/// let tracer = CallTracer::builder()
///     .with_input_log(sink.clone())
///     .with_output_log(sink)
///     .build();
///
/// let add = tracer.wrap("add", |(a, b): (i32, i32)| a + b);
/// assert_eq!(add((2, 3)).unwrap(), 5);
/// assert!(out.contents().ends_with("output 5\n"));
/// ```
#[derive(Clone)]
pub struct CallTracer {
    input_formatter: InputFormatter,
    output_formatter: OutputFormatter,
    input_log: DebugLogger,
    output_log: DebugLogger,
}

impl Default for CallTracer {
    fn default() -> Self {
        CallTracerBuilder::default().build()
    }
}

impl CallTracer {
    pub fn builder() -> CallTracerBuilder {
        CallTracerBuilder::default()
    }

    pub fn input_log(&self) -> &DebugLogger {
        &self.input_log
    }

    pub fn output_log(&self) -> &DebugLogger {
        &self.output_log
    }

    fn log_input(&self, function: &str, args: &dyn Debug) -> Result<()> {
        let record = CallRecord { function, args };
        if let Some(line) = (self.input_formatter)(&record) {
            self.input_log.log(line)?;
        }
        Ok(())
    }

    fn log_output(&self, function: &str, value: &dyn Debug) -> Result<()> {
        let record = ReturnRecord { function, value };
        if let Some(line) = (self.output_formatter)(&record) {
            self.output_log.log(line)?;
        }
        Ok(())
    }

    /// Returns `f` wrapped with input and output logging.
    ///
    /// The wrapped function takes the same packed arguments as `f` and
    /// returns its value unchanged. Sink write failures are returned as
    /// errors; if the input record cannot be written `f` is not called.
    pub fn wrap<A, R, F>(&self, name: impl Into<String>, f: F) -> impl Fn(A) -> Result<R>
    where
        A: Debug,
        R: Debug,
        F: Fn(A) -> R,
    {
        let tracer = self.clone();
        let name = name.into();
        move |args: A| {
            tracer.log_input(&name, &args)?;
            let value = f(args);
            tracer.log_output(&name, &value)?;
            Ok(value)
        }
    }

    /// Like [`CallTracer::wrap`] for functions that can fail.
    ///
    /// An `Err` from `f` is returned as is (it downcasts back to `E`) and no
    /// output record is written for that call.
    pub fn wrap_fallible<A, T, E, F>(
        &self,
        name: impl Into<String>,
        f: F,
    ) -> impl Fn(A) -> Result<T>
    where
        A: Debug,
        T: Debug,
        E: Into<anyhow::Error>,
        F: Fn(A) -> std::result::Result<T, E>,
    {
        let tracer = self.clone();
        let name = name.into();
        move |args: A| {
            tracer.log_input(&name, &args)?;
            let value = match f(args) {
                Ok(value) => value,
                Err(e) => {
                    trace!(function = %name, "wrapped call failed, output record skipped");
                    return Err(e.into());
                }
            };
            tracer.log_output(&name, &value)?;
            Ok(value)
        }
    }
}

impl Debug for CallTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallTracer")
            .field("input_log", &self.input_log.name())
            .field("output_log", &self.output_log.name())
            .finish()
    }
}

/// Builder for [`CallTracer`]. Anything left unset falls back to the default
/// formatters and to [`default_logger`].
#[derive(Default)]
pub struct CallTracerBuilder {
    input_formatter: Option<InputFormatter>,
    output_formatter: Option<OutputFormatter>,
    input_log: Option<DebugLogger>,
    output_log: Option<DebugLogger>,
}

impl CallTracerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how call records are turned into lines
    pub fn with_input_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CallRecord<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.input_formatter = Some(Arc::new(formatter));
        self
    }

    /// Sets how return records are turned into lines
    pub fn with_output_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&ReturnRecord<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.output_formatter = Some(Arc::new(formatter));
        self
    }

    /// Sets the logger call records are written to
    pub fn with_input_log(mut self, logger: DebugLogger) -> Self {
        self.input_log = Some(logger);
        self
    }

    /// Sets the logger return records are written to
    pub fn with_output_log(mut self, logger: DebugLogger) -> Self {
        self.output_log = Some(logger);
        self
    }

    pub fn build(self) -> CallTracer {
        CallTracer {
            input_formatter: self
                .input_formatter
                .unwrap_or_else(|| Arc::new(default_input_formatter) as InputFormatter),
            output_formatter: self
                .output_formatter
                .unwrap_or_else(|| Arc::new(default_output_formatter) as OutputFormatter),
            input_log: self.input_log.unwrap_or_else(default_logger),
            output_log: self.output_log.unwrap_or_else(default_logger),
        }
    }
}
