//! Tools to get deboogie on.
//!
//! This crate is a thin debugging layer made of three independent pieces:
//!
//! * Logger factory: [`get_debug_logger`] builds a named logger bound to one
//! destination stream, bundled with its handler and a pretty-printer
//! (indent 2, width 80). Each call builds a fresh sink, even for a name seen before.
//! [`null_debug_logger`] discards everything and [`default_logger`] is the
//! process-wide logger used when nothing else is given.
//!
//! * Iteration tracer: [`iter_debug`] and [`iter_debug_with`] wrap an
//! iterator so every element is logged as it is pulled through, then yielded
//! unchanged.
//!
//! * Call tracer: [`CallTracer`] wraps a function so its packed arguments are
//! logged before each call and its return value after a successful one.
//! Formatters may return `None` to log nothing for that side.
//!
//! Everything is synchronous. A write reaches the destination stream before
//! the logging call returns, and stream errors are handed back to the caller.

pub use call_tracer::{
    default_input_formatter, default_output_formatter, suppress_input, suppress_output,
    CallRecord, CallTracer, CallTracerBuilder, InputFormatter, OutputFormatter, ReturnRecord,
};
pub use destination::{Destination, MemoryStream};
pub use handler::StreamHandler;
pub use iter_debug::{iter_debug, iter_debug_with, IterDebug, IterDebugExt};
pub use logger::{
    build_debug_logger, default_logger, get_debug_logger, null_debug_logger, DebugLogger, Logger,
};
pub use pretty::PrettyPrinter;

pub mod config;
mod call_tracer;
mod destination;
mod handler;
mod iter_debug;
mod logger;
mod pretty;
