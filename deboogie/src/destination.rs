use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use parking_lot::Mutex;

/// Where a handler sends the lines it emits.
#[derive(Default)]
pub enum Destination {
    /// Process standard error
    #[default]
    Stderr,
    /// Process standard output
    Stdout,
    /// Discards every line
    Null,
    /// Shared in-memory buffer, readable by any clone of the stream
    Memory(MemoryStream),
    /// Any caller supplied stream
    Writer(Box<dyn Write + Send>),
    /// Forwards each line to the current `tracing` dispatcher at DEBUG
    Tracing,
}

impl Destination {
    /// Wraps an arbitrary stream.
    pub fn writer(stream: impl Write + Send + 'static) -> Self {
        Destination::Writer(Box::new(stream))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Destination::Stderr => "stderr",
            Destination::Stdout => "stdout",
            Destination::Null => "null",
            Destination::Memory(_) => "memory",
            Destination::Writer(_) => "writer",
            Destination::Tracing => "tracing",
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stderr => f.write_str("Stderr"),
            Destination::Stdout => f.write_str("Stdout"),
            Destination::Null => f.write_str("Null"),
            Destination::Memory(stream) => f.debug_tuple("Memory").field(stream).finish(),
            Destination::Writer(_) => f.write_str("Writer(..)"),
            Destination::Tracing => f.write_str("Tracing"),
        }
    }
}

impl From<MemoryStream> for Destination {
    fn from(stream: MemoryStream) -> Self {
        Destination::Memory(stream)
    }
}

/// An in-memory stream whose clones all share one buffer.
///
/// Hand one clone to a logger and keep another to read back what was written.
#[derive(Clone, Default)]
pub struct MemoryStream {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Everything written so far, split into lines without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl fmt::Debug for MemoryStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStream")
            .field("len", &self.buffer.lock().len())
            .finish()
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
