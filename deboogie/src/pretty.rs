use std::fmt::Debug;
use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::{DEFAULT_INDENT, DEFAULT_WIDTH};

// Indent width produced by `{:#?}`.
const DEBUG_INDENT: usize = 4;

/// Formatter with a fixed indentation width and line width.
///
/// Values whose compact form fits in `width` characters stay on one line,
/// anything longer is laid out over several lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyPrinter {
    indent: usize,
    width: usize,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl PrettyPrinter {
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Formats `value` on one line when its `{:?}` form has no newline and
    /// fits the width. Otherwise uses the alternate `{:#?}` form re-indented
    /// to this printer's indent.
    ///
    /// Re-indenting rescales every leading run of spaces. A custom `Debug`
    /// impl that writes its own leading spaces after a newline has those
    /// rescaled too.
    pub fn pformat<T: Debug + ?Sized>(&self, value: &T) -> String {
        let flat = format!("{:?}", value);
        if !flat.contains('\n') && flat.chars().count() <= self.width {
            return flat;
        }
        reindent(&format!("{:#?}", value), self.indent)
    }

    /// Formats `value` as indented JSON.
    pub fn pformat_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let indent = " ".repeat(self.indent);
        let mut out = Vec::new();
        {
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut ser)?;
        }
        Ok(String::from_utf8(out)?)
    }
}

/// `label` followed by the pretty form of `value`.
pub(crate) fn pretty_debug<T: Debug + ?Sized>(
    printer: &PrettyPrinter,
    label: &str,
    value: &T,
) -> String {
    format!("{} {}", label, printer.pformat(value))
}

// Derived `Debug` escapes embedded newlines, so leading space runs come from
// the formatter's own nesting.
fn reindent(text: &str, width: usize) -> String {
    if width == DEBUG_INDENT {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let body = line.trim_start_matches(' ');
        let lead = line.len() - body.len();
        let spaces = (lead / DEBUG_INDENT) * width + lead % DEBUG_INDENT;
        out.extend(std::iter::repeat(' ').take(spaces));
        out.push_str(body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fmt;

    #[test]
    fn test_defaults() {
        let printer = PrettyPrinter::default();
        assert_eq!(printer.indent(), 2);
        assert_eq!(printer.width(), 80);
    }

    #[test]
    fn test_short_compound_value_stays_on_one_line() {
        let printer = PrettyPrinter::default();
        assert_eq!(printer.pformat(&((1, 2), 3)), "((1, 2), 3)");

        let kwargs = BTreeMap::from([("x", 3)]);
        assert_eq!(printer.pformat(&((1, 2), kwargs)), "((1, 2), {\"x\": 3})");
    }

    #[test]
    fn test_long_value_is_split_and_reindented() {
        let printer = PrettyPrinter::default();
        let value = vec![vec![1000u32; 20]];
        assert!(format!("{:?}", value).len() > 80);

        let expected = format!("[\n  [\n{}  ],\n]", "    1000,\n".repeat(20));
        assert_eq!(printer.pformat(&value), expected);
    }

    #[test]
    fn test_width_bound_is_inclusive() {
        let value = (1, 2);
        let printer = PrettyPrinter::default().with_width(6);
        assert_eq!(printer.pformat(&value), "(1, 2)");

        let narrow = PrettyPrinter::default().with_width(5);
        assert_eq!(narrow.pformat(&value), "(\n  1,\n  2,\n)");
    }

    #[test]
    fn test_pformat_scalar_is_single_line() {
        let printer = PrettyPrinter::new(2);
        assert_eq!(printer.pformat(&42), "42");
        assert_eq!(printer.pformat("jive"), "\"jive\"");
    }

    #[test]
    fn test_pformat_keeps_debug_width_of_four() {
        let printer = PrettyPrinter::new(4).with_width(0);
        assert_eq!(printer.pformat(&(1,)), format!("{:#?}", (1,)));
    }

    #[test]
    fn test_custom_debug_leading_spaces_are_rescaled() {
        struct Poem;

        impl fmt::Debug for Poem {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("roses\n        are red")
            }
        }

        let printer = PrettyPrinter::default();
        assert_eq!(printer.pformat(&Poem), "roses\n    are red");
        assert_eq!(PrettyPrinter::new(4).pformat(&Poem), "roses\n        are red");
    }

    #[test]
    fn test_pformat_json() -> Result<()> {
        let mut map = BTreeMap::new();
        map.insert("x", vec![3]);
        let printer = PrettyPrinter::default();
        assert_eq!(printer.pformat_json(&map)?, "{\n  \"x\": [\n    3\n  ]\n}");
        Ok(())
    }

    #[test]
    fn test_pretty_debug_label() {
        let printer = PrettyPrinter::default();
        assert_eq!(pretty_debug(&printer, "output", &7), "output 7");
    }
}
