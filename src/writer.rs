use std::fmt;
use std::io;

use csv_table_core::{QuoteStyle, Writer as CoreWriter};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reader::Position;
use crate::serializer::serialize_field;

/// Write a table as CSV text with the default configuration.
///
/// Every field may be any scalar that implements `serde::Serialize`:
/// strings, booleans, numbers, `Option`s of those or a `Value`.
///
/// # Example
///
/// ```
/// let out = csv_table::stringify(&[
///     vec!["name", "quote"],
///     vec!["ann", "say \"hi\", then leave"],
/// ]).unwrap();
/// assert_eq!(out, "name,quote\nann,\"say \"\"hi\"\", then leave\"\n");
/// ```
pub fn stringify<R, T>(table: &[R]) -> Result<String>
where
    R: AsRef<[T]>,
    T: Serialize,
{
    Writer::new().stringify(table)
}

/// Options that control writing.
///
/// Like `ParseOptions`, this can be deserialized from a host application's
/// configuration. Missing keys take their default values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Terminate the last record with a newline.
    ///
    /// Enabled by default.
    pub eof: bool,
}

impl Default for WriteOptions {
    fn default() -> WriteOptions {
        WriteOptions { eof: true }
    }
}

/// Builds a CSV writer with various configuration knobs.
#[derive(Debug, Default)]
pub struct WriterBuilder {
    opts: WriteOptions,
}

impl WriterBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Create a new builder from previously loaded options.
    pub fn from_options(opts: WriteOptions) -> WriterBuilder {
        WriterBuilder { opts }
    }

    /// Build a writer from this configuration.
    pub fn build(&self) -> Writer {
        Writer { opts: self.opts }
    }

    /// Whether to write a newline after the last record.
    ///
    /// When disabled, records are still separated by `\n`, but the output
    /// ends right after the last field.
    ///
    /// This is enabled by default.
    pub fn eof(&mut self, yes: bool) -> &mut WriterBuilder {
        self.opts.eof = yes;
        self
    }
}

/// A configured CSV writer.
///
/// Fields are separated by `,` and records by `\n`. A field is quoted when
/// it contains a quote, a comma or a newline byte, and quotes inside it are
/// doubled. A record made of a single empty field is written as `""` so
/// that it is not mistaken for a blank line.
///
/// # RFC 4180
///
/// This writer conforms to RFC 4180 with one exception: it doesn't guarantee
/// that all records written are of the same length. Instead, the onus is on
/// the caller to ensure that all records written are of the same length.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    opts: WriteOptions,
}

impl Writer {
    /// Create a writer with the default configuration.
    pub fn new() -> Writer {
        Writer::default()
    }

    /// The options this writer was built with.
    pub fn options(&self) -> &WriteOptions {
        &self.opts
    }

    /// Write a table as CSV text.
    pub fn stringify<R, T>(&self, table: &[R]) -> Result<String>
    where
        R: AsRef<[T]>,
        T: Serialize,
    {
        self.stringify_with(table, |text, _| text)
    }

    /// Write a table as CSV text, passing the text of every field through
    /// `replacer` before it is escaped.
    ///
    /// # Example
    ///
    /// ```
    /// use csv_table::WriterBuilder;
    ///
    /// let wtr = WriterBuilder::new().eof(false).build();
    /// let out = wtr.stringify_with(&[[1, 2], [3, 4]], |text, pos| {
    ///     if pos.row() == 1 { format!("<{}>", text) } else { text }
    /// }).unwrap();
    /// assert_eq!(out, "<1>,<2>\n3,4");
    /// ```
    pub fn stringify_with<R, T, F>(
        &self,
        table: &[R],
        mut replacer: F,
    ) -> Result<String>
    where
        R: AsRef<[T]>,
        T: Serialize,
        F: FnMut(String, Position) -> String,
    {
        let mut wtr = CoreWriter::new();
        let mut out = String::new();
        let mut pos = Position::new();
        for (i, record) in table.iter().enumerate() {
            let record = record.as_ref();
            if i > 0 {
                wtr.terminator(&mut out).map_err(fmt_error)?;
            }
            pos.set_row(i as u64 + 1).set_byte(out.len() as u64);
            for (j, field) in record.iter().enumerate() {
                pos.set_col(j as u64 + 1);
                let mut text = String::new();
                serialize_field(field, &mut text).map_err(|err| err.at(pos))?;
                let text = replacer(text, pos);
                let style = if record.len() == 1 && text.is_empty() {
                    QuoteStyle::Always
                } else {
                    QuoteStyle::Necessary
                };
                wtr.field_with_style(&text, style, &mut out)
                    .map_err(fmt_error)?;
            }
        }
        if self.opts.eof && !table.is_empty() {
            wtr.terminator(&mut out).map_err(fmt_error)?;
        }
        debug!("wrote {} records in {} bytes", table.len(), out.len());
        Ok(out)
    }
}

/// A failure of the output sink itself. A `String` sink never fails, so this
/// is unreachable from `stringify`, but it is never reported as a field
/// error.
fn fmt_error(err: fmt::Error) -> Error {
    Error::from(io::Error::new(io::ErrorKind::Other, err))
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use crate::error::ErrorKind;
    use crate::reader::parse;
    use crate::value::Value;

    use super::{fmt_error, stringify, WriteOptions, WriterBuilder};

    #[test]
    fn simple() {
        let got = stringify(&[vec!["a", "b", "c"], vec!["1", "2", "3"]]).unwrap();
        assert_eq!(got, "a,b,c\n1,2,3\n");
    }

    #[test]
    fn no_eof() {
        let wtr = WriterBuilder::new().eof(false).build();
        let got = wtr.stringify(&[vec!["a", "b"], vec!["c", "d"]]).unwrap();
        assert_eq!(got, "a,b\nc,d");
    }

    #[test]
    fn empty_table() {
        let table: Vec<Vec<String>> = vec![];
        assert_eq!(stringify(&table).unwrap(), "");
        let wtr = WriterBuilder::new().eof(false).build();
        assert_eq!(wtr.stringify(&table).unwrap(), "");
    }

    #[test]
    fn quotes_are_doubled() {
        let got = stringify(&[vec!["a\"b", "\"", "x"]]).unwrap();
        assert_eq!(got, "\"a\"\"b\",\"\"\"\",x\n");
    }

    #[test]
    fn delimiters_and_newlines_are_quoted() {
        let got = stringify(&[vec!["a,b", "c\nd", "e\r\nf", "g\rh"]]).unwrap();
        assert_eq!(got, "\"a,b\",\"c\nd\",\"e\r\nf\",\"g\rh\"\n");
    }

    #[test]
    fn lone_empty_field() {
        let got = stringify(&[vec!["a"], vec![""], vec!["b"]]).unwrap();
        assert_eq!(got, "a\n\"\"\nb\n");
        let got = stringify(&[vec!["", ""]]).unwrap();
        assert_eq!(got, ",\n");
    }

    #[test]
    fn typed_values() {
        let table = vec![vec![
            Value::Bool(true),
            Value::Int(3),
            Value::Float(2.5),
            Value::from("hi, there"),
        ]];
        assert_eq!(stringify(&table).unwrap(), "true,3,2.5,\"hi, there\"\n");
    }

    #[test]
    fn mixed_scalars() {
        let got = stringify(&[[Some(1.5), None], [Some(-2.0), Some(0.25)]]).unwrap();
        assert_eq!(got, "1.5,\n-2.0,0.25\n");
    }

    #[test]
    fn invalid_field_has_position() {
        let err = stringify(&[vec![vec![1]], vec![vec![2, 3]]]).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidField { pos: Some(ref pos), .. } => {
                assert_eq!((pos.row(), pos.col()), (1, 1));
            }
            ref x => panic!("expected InvalidField but got {:?}", x),
        }
    }

    #[test]
    fn replacer_sees_positions() {
        let wtr = WriterBuilder::new().build();
        let got = wtr
            .stringify_with(&[vec!["a", "b"], vec!["c"]], |text, pos| {
                format!("{}{}{}", text, pos.row(), pos.col())
            })
            .unwrap();
        assert_eq!(got, "a11,b12\nc21\n");
    }

    #[test]
    fn replacer_output_is_escaped() {
        let wtr = WriterBuilder::new().build();
        let got = wtr
            .stringify_with(&[vec!["a"]], |text, _| format!("{},\"", text))
            .unwrap();
        assert_eq!(got, "\"a,\"\"\"\n");
    }

    #[test]
    fn round_trip() {
        let tables: Vec<Vec<Vec<&str>>> = vec![
            vec![vec!["a", "b", "c"], vec!["1", "2", "3"]],
            vec![vec!["", "", ""], vec!["", "", ""]],
            vec![vec!["a,b", "say \"hi\""], vec!["line\nbreak", "cr\rlf\r\n"]],
            vec![vec!["x"], vec![""], vec!["y", ""]],
            vec![vec!["\""], vec!["\"\""], vec![",\","]],
            vec![vec!["ß", "☃"], vec![" padded ", "\ttab"]],
        ];
        for eof in &[true, false] {
            let wtr = WriterBuilder::new().eof(*eof).build();
            for table in &tables {
                let text = wtr.stringify(table).unwrap();
                assert_eq!(&parse(&text).unwrap(), table, "{:?}", text);
            }
        }
    }

    /// A table built from the characters the writer has to escape. Every
    /// record has at least one field, since the parser never yields an
    /// empty record.
    fn structural_table(mut seed: u64) -> Vec<Vec<String>> {
        const PIECES: &[&str] =
            &["", "a", " ", "\"", "\"\"", ",", "\r", "\n", "\r\n", "\n\r"];
        let mut next = move |n: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % n
        };
        let mut table = vec![];
        for _ in 0..next(4) + 1 {
            let mut record = vec![];
            for _ in 0..next(3) + 1 {
                let mut field = String::new();
                for _ in 0..next(4) {
                    field.push_str(PIECES[next(PIECES.len() as u64) as usize]);
                }
                record.push(field);
            }
            table.push(record);
        }
        table
    }

    #[test]
    fn round_trip_generated() {
        let wtrs = [
            WriterBuilder::new().eof(true).build(),
            WriterBuilder::new().eof(false).build(),
        ];
        for seed in 1..2_000u64 {
            let table = structural_table(seed);
            for wtr in &wtrs {
                let text = wtr.stringify(&table).unwrap();
                assert_eq!(parse(&text).unwrap(), table, "{:?}", text);
            }
        }
    }

    #[test]
    fn sink_failure_is_not_a_field_error() {
        let err = fmt_error(fmt::Error);
        assert!(err.is_io_error());
        assert!(err.position().is_none());
    }

    #[test]
    fn options_from_config() {
        let opts: WriteOptions = serde_json::from_str(r#"{"eof":false}"#).unwrap();
        assert!(!WriterBuilder::from_options(opts).build().options().eof);

        let opts: WriteOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.eof);
    }
}
