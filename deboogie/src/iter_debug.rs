use std::fmt::Display;
use std::iter::FusedIterator;
use tracing::warn;

use crate::destination::Destination;
use crate::logger::{get_debug_logger, DebugLogger};

/// Iterator adapter that logs every element as it passes through.
///
/// Single pass: each `next()` pulls one element from the inner iterator,
/// writes the stringified element as one line, then hands the element back
/// untouched. Nothing is buffered.
///
/// A failing write cannot change what the iterator yields, so the first
/// failure is kept for [`IterDebug::take_error`] and iteration carries on.
pub struct IterDebug<I, F> {
    inner: I,
    stringifier: F,
    logger: DebugLogger,
    error: Option<anyhow::Error>,
}

impl<I, F> IterDebug<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> String,
{
    pub fn new(inner: I, stringifier: F, logger: DebugLogger) -> Self {
        Self {
            inner,
            stringifier,
            logger,
            error: None,
        }
    }

    pub fn logger(&self) -> &DebugLogger {
        &self.logger
    }

    /// Returns the first write failure seen so far, if any, and clears it.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }
}

impl<I, F> Iterator for IterDebug<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> String,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        let line = (self.stringifier)(&item);
        if let Err(e) = self.logger.log(line) {
            warn!(logger = %self.logger.name(), "failed to log iterated element: {}", e);
            self.error.get_or_insert(e);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I, F> FusedIterator for IterDebug<I, F>
where
    I: FusedIterator,
    F: FnMut(&I::Item) -> String,
{
}

fn display_string<T: Display>(item: &T) -> String {
    item.to_string()
}

type DisplayFn<T> = fn(&T) -> String;

/// Logs each element of `iter` to `destination` (stderr when `None`) using
/// its `Display` form.
pub fn iter_debug<I>(
    name: impl Into<String>,
    iter: I,
    destination: Option<Destination>,
) -> IterDebug<I::IntoIter, DisplayFn<I::Item>>
where
    I: IntoIterator,
    I::Item: Display,
{
    let stringifier = display_string::<I::Item> as DisplayFn<I::Item>;
    iter_debug_with(name, iter, stringifier, destination)
}

/// Logs each element of `iter` through `stringifier` to `destination`
/// (stderr when `None`).
///
/// ```
/// use deboogie::{iter_debug_with, MemoryStream};
///
/// let out = MemoryStream::new();
/// let jive = |i: &i32| format!("jive {}", i);
/// let dejives = iter_debug_with("jives", [1, 2, 3], jive, Some(out.clone().into()));
/// assert_eq!(dejives.collect::<Vec<_>>(), vec![1, 2, 3]);
/// assert_eq!(out.lines(), vec!["jive 1", "jive 2", "jive 3"]);
/// ```
pub fn iter_debug_with<I, F>(
    name: impl Into<String>,
    iter: I,
    stringifier: F,
    destination: Option<Destination>,
) -> IterDebug<I::IntoIter, F>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> String,
{
    IterDebug::new(iter.into_iter(), stringifier, get_debug_logger(name, destination))
}

/// Extension methods to trace any iterable in place.
pub trait IterDebugExt: IntoIterator + Sized {
    /// Logs each element to stderr using its `Display` form.
    fn debug_each(self, name: impl Into<String>) -> IterDebug<Self::IntoIter, DisplayFn<Self::Item>>
    where
        Self::Item: Display,
    {
        iter_debug(name, self, None)
    }

    fn debug_each_with<F>(
        self,
        logger: DebugLogger,
        stringifier: F,
    ) -> IterDebug<Self::IntoIter, F>
    where
        F: FnMut(&Self::Item) -> String,
    {
        IterDebug::new(self.into_iter(), stringifier, logger)
    }
}

impl<T: IntoIterator> IterDebugExt for T {}
