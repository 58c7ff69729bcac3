use core::fmt;

use memchr::{memchr, memchr3};

/// The quoting style to use when writing a field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteStyle {
    /// This puts quotes around the field. Always.
    Always,
    /// This puts quotes around the field only when necessary.
    ///
    /// They are necessary when a field contains a quote, delimiter or any
    /// newline byte.
    ///
    /// This is the default.
    Necessary,
}

impl Default for QuoteStyle {
    fn default() -> QuoteStyle {
        QuoteStyle::Necessary
    }
}

/// A writer for CSV fields.
///
/// The writer tracks whether a delimiter must precede the next field and
/// streams escaped text into any `fmt::Write` sink. Fields are separated
/// by `,` and records are terminated by `\n`.
///
/// # RFC 4180
///
/// This writer conforms to RFC 4180 with one exception: it doesn't guarantee
/// that all records written are of the same length. Instead, the onus is on
/// the caller to ensure that all records written are of the same length.
#[derive(Clone, Debug)]
pub struct Writer {
    first_field_in_record: bool,
}

impl Default for Writer {
    fn default() -> Writer {
        Writer { first_field_in_record: true }
    }
}

impl Writer {
    /// Creates a new CSV writer positioned at the start of a record.
    pub fn new() -> Writer {
        Writer::default()
    }

    /// Write a field, quoting it only when necessary.
    pub fn field<W: fmt::Write>(
        &mut self,
        field: &str,
        out: &mut W,
    ) -> fmt::Result {
        self.field_with_style(field, QuoteStyle::Necessary, out)
    }

    /// Write a field with the given quoting style.
    ///
    /// A delimiter is written first unless this is the first field of the
    /// current record.
    pub fn field_with_style<W: fmt::Write>(
        &mut self,
        field: &str,
        style: QuoteStyle,
        out: &mut W,
    ) -> fmt::Result {
        if !self.first_field_in_record {
            out.write_char(',')?;
        }
        self.first_field_in_record = false;
        let quote = match style {
            QuoteStyle::Always => true,
            QuoteStyle::Necessary => needs_quotes(field),
        };
        if quote {
            write_quoted(field, out)
        } else {
            out.write_str(field)
        }
    }

    /// Write a record terminator and start a new record.
    pub fn terminator<W: fmt::Write>(&mut self, out: &mut W) -> fmt::Result {
        self.first_field_in_record = true;
        out.write_char('\n')
    }

    /// Returns true if nothing has been written to the current record.
    pub fn is_record_start(&self) -> bool {
        self.first_field_in_record
    }
}

/// Returns true if and only if `field` must be quoted to survive a parse.
pub fn needs_quotes(field: &str) -> bool {
    let bytes = field.as_bytes();
    memchr3(b'"', b',', b'\n', bytes).is_some() || memchr(b'\r', bytes).is_some()
}

/// Writes `field` wrapped in quotes, doubling every quote inside it.
fn write_quoted<W: fmt::Write>(field: &str, out: &mut W) -> fmt::Result {
    out.write_char('"')?;
    let mut rest = field;
    while let Some(i) = memchr(b'"', rest.as_bytes()) {
        out.write_str(&rest[..i + 1])?;
        out.write_char('"')?;
        rest = &rest[i + 1..];
    }
    out.write_str(rest)?;
    out.write_char('"')
}
