use std::io::{self, Write};
use anyhow::Result;
use parking_lot::Mutex;
use tracing::debug;

use crate::destination::Destination;

/// Binding between a logger and one destination stream.
///
/// Each record becomes exactly one line, handed to the stream in a single
/// `write_all` and flushed right after. The stream lock is held only for that
/// write, so independent handlers never contend.
pub struct StreamHandler {
    kind: &'static str,
    target: HandlerTarget,
}

enum HandlerTarget {
    Stream(Mutex<Box<dyn Write + Send>>),
    Null,
    Tracing,
}

impl StreamHandler {
    pub fn new(destination: Destination) -> Self {
        let kind = destination.kind();
        let target = match destination {
            Destination::Stderr => HandlerTarget::Stream(Mutex::new(Box::new(io::stderr()))),
            Destination::Stdout => HandlerTarget::Stream(Mutex::new(Box::new(io::stdout()))),
            Destination::Memory(stream) => HandlerTarget::Stream(Mutex::new(Box::new(stream))),
            Destination::Writer(stream) => HandlerTarget::Stream(Mutex::new(stream)),
            Destination::Null => HandlerTarget::Null,
            Destination::Tracing => HandlerTarget::Tracing,
        };
        Self { kind, target }
    }

    /// Short name of the destination this handler writes to.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Writes `message` followed by a newline.
    ///
    /// Stream errors are returned as is; callers can downcast to [`io::Error`].
    pub(crate) fn emit(&self, logger: &str, message: &str) -> Result<()> {
        match &self.target {
            HandlerTarget::Stream(stream) => {
                let mut line = String::with_capacity(message.len() + 1);
                line.push_str(message);
                line.push('\n');

                let mut stream = stream.lock();
                stream.write_all(line.as_bytes())?;
                stream.flush()?;
            }
            HandlerTarget::Null => {}
            HandlerTarget::Tracing => {
                debug!(logger = %logger, "{}", message);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandler").field("kind", &self.kind).finish()
    }
}
