use std::error::Error as StdError;
use std::mem;
use std::result;

use csv_table_core::{Action, Lexer, Reader as CoreReader};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{new_illegal_state, Error, ErrorKind, Result};
use crate::value::Value;

/// A single row: an ordered sequence of fields.
pub type Record<T = String> = Vec<T>;

/// A parsed table: an ordered sequence of records.
///
/// Records are not required to have the same number of fields.
pub type Table<T = String> = Vec<Record<T>>;

/// Parse CSV text into a table of raw string fields.
///
/// This is a convenience for `ReaderBuilder::new().build()` that skips type
/// inference and revivers entirely.
///
/// # Example
///
/// ```
/// let table = csv_table::parse("a,\"b,c\",d\n1,2,3").unwrap();
/// assert_eq!(table, vec![vec!["a", "b,c", "d"], vec!["1", "2", "3"]]);
/// ```
pub fn parse(text: &str) -> Result<Table> {
    Reader::new().run(text, |raw, _| Ok(raw))
}

/// Parse CSV text, inferring booleans, integers and floats.
///
/// See `infer_type` for the exact grammar.
///
/// # Example
///
/// ```
/// use csv_table::Value;
///
/// let table = csv_table::parse_typed("true,3,2.5,hi").unwrap();
/// assert_eq!(table, vec![vec![
///     Value::Bool(true),
///     Value::Int(3),
///     Value::Float(2.5),
///     Value::from("hi"),
/// ]]);
/// ```
pub fn parse_typed(text: &str) -> Result<Table<Value>> {
    ReaderBuilder::new().typed(true).build().parse(text)
}

/// The position of a field in CSV text.
///
/// Rows and columns are 1-based. The row is the number of the record being
/// built and the column is the number of the field being built within it.
/// The byte offset is 0-based and points at the token that triggered the
/// event: the terminator of a field, the rejected token of an error or the
/// end of input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    byte: u64,
    row: u64,
    col: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// Returns a new position pointing at the first field of the first row.
    pub fn new() -> Position {
        Position { byte: 0, row: 1, col: 1 }
    }

    /// The byte offset, starting at `0`, of this position.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The row number, starting at `1`, of this position.
    pub fn row(&self) -> u64 {
        self.row
    }

    /// The column number, starting at `1`, of this position.
    pub fn col(&self) -> u64 {
        self.col
    }

    /// Set the byte offset of this position.
    pub fn set_byte(&mut self, byte: u64) -> &mut Position {
        self.byte = byte;
        self
    }

    /// Set the row number of this position.
    ///
    /// # Panics
    ///
    /// If the row number is `0`, then this panics.
    pub fn set_row(&mut self, row: u64) -> &mut Position {
        assert!(row > 0);
        self.row = row;
        self
    }

    /// Set the column number of this position.
    ///
    /// # Panics
    ///
    /// If the column number is `0`, then this panics.
    pub fn set_col(&mut self, col: u64) -> &mut Position {
        assert!(col > 0);
        self.col = col;
        self
    }
}

/// Options that control parsing.
///
/// This is plain data so that it can be embedded in a host application's
/// own configuration. Missing keys take their default values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Infer booleans, integers and floats from field text.
    ///
    /// Disabled by default.
    pub typed: bool,
}

/// Builds a CSV reader with various configuration knobs.
///
/// Once a `Reader` is built, its configuration cannot be changed.
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    opts: ParseOptions,
}

impl ReaderBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Create a new builder from previously loaded options.
    pub fn from_options(opts: ParseOptions) -> ReaderBuilder {
        ReaderBuilder { opts }
    }

    /// Build a reader from this configuration.
    pub fn build(&self) -> Reader {
        Reader { opts: self.opts }
    }

    /// Whether to infer scalar types from field text.
    ///
    /// When enabled, `true` and `false` become `Value::Bool`, decimal
    /// numbers become `Value::Float` and integers become `Value::Int`. All
    /// other text stays `Value::String`.
    ///
    /// This is disabled by default.
    pub fn typed(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.opts.typed = yes;
        self
    }
}

/// A configured CSV parser.
///
/// A reader holds only its configuration, so one reader can be shared
/// freely and used for any number of parses, including from several threads
/// at once. Each call builds its own cursor and either returns a complete
/// table or an error, never a partial result.
///
/// # Example
///
/// ```
/// use csv_table::{ReaderBuilder, Value};
///
/// let rdr = ReaderBuilder::new().typed(true).build();
/// let table = rdr.parse_with("x,1\ny,2\n", |value, pos| {
///     if pos.col() == 2 { value.as_i64().unwrap_or(0) * 10 } else { 0 }
/// }).unwrap();
/// assert_eq!(table, vec![vec![0, 10], vec![0, 20]]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Reader {
    opts: ParseOptions,
}

impl Reader {
    /// Create a reader with the default configuration.
    pub fn new() -> Reader {
        Reader::default()
    }

    /// The options this reader was built with.
    pub fn options(&self) -> &ParseOptions {
        &self.opts
    }

    /// Parse CSV text into a table of values.
    ///
    /// Without the `typed` option, every field is a `Value::String`.
    pub fn parse(&self, text: &str) -> Result<Table<Value>> {
        let typed = self.opts.typed;
        self.run(text, |raw, _| Ok(Value::from_field(raw, typed)))
    }

    /// Parse CSV text, passing every field through `reviver`.
    ///
    /// The reviver is called once per field, in input order, at the moment
    /// the field is complete. It receives the (possibly inferred) value and
    /// the field's position and returns the value stored in the table.
    pub fn parse_with<T, F>(&self, text: &str, mut reviver: F) -> Result<Table<T>>
    where
        F: FnMut(Value, Position) -> T,
    {
        let typed = self.opts.typed;
        self.run(text, |raw, pos| Ok(reviver(Value::from_field(raw, typed), pos)))
    }

    /// Like `parse_with`, but the reviver may abort the parse.
    ///
    /// The first reviver error stops parsing and is returned as
    /// `ErrorKind::Reviver`, carrying the position of the field.
    pub fn try_parse_with<T, E, F>(
        &self,
        text: &str,
        mut reviver: F,
    ) -> Result<Table<T>>
    where
        F: FnMut(Value, Position) -> result::Result<T, E>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let typed = self.opts.typed;
        self.run(text, |raw, pos| {
            reviver(Value::from_field(raw, typed), pos).map_err(|err| {
                Error::new(ErrorKind::Reviver { pos, err: err.into() })
            })
        })
    }

    /// Drive the lexer and parser machine over `text`, finishing every field
    /// with `finish`.
    fn run<T, F>(&self, text: &str, finish: F) -> Result<Table<T>>
    where
        F: FnMut(String, Position) -> Result<T>,
    {
        let mut cursor = Cursor::new(finish);
        let mut machine = CoreReader::new();
        for (offset, token) in Lexer::new(text) {
            cursor.pos.set_byte(offset as u64);
            let action = match machine.feed(token) {
                Ok(action) => action,
                Err(err) => {
                    debug!(
                        "aborting parse at row {}, column {}: {}",
                        cursor.pos.row(),
                        cursor.pos.col(),
                        err
                    );
                    return Err(new_illegal_state(cursor.pos, err));
                }
            };
            trace!("{:?} -> {:?}: {:?}", token, machine.state(), action);
            match action {
                Action::Nothing => {}
                Action::Append(s) => cursor.buf.push_str(s),
                Action::EndField { record_end } => {
                    cursor.end_field()?;
                    if record_end {
                        cursor.end_record();
                    }
                }
            }
        }
        // Flush a last line that was not terminated by a newline.
        cursor.pos.set_byte(text.len() as u64);
        if machine.finish() || !cursor.record.is_empty() {
            cursor.end_field()?;
            cursor.end_record();
        }
        debug!(
            "parsed {} records from {} bytes",
            cursor.table.len(),
            text.len()
        );
        Ok(cursor.table)
    }
}

/// The state of a single parse: the field being built, the record being
/// built, the finished records and the current position.
struct Cursor<T, F> {
    finish: F,
    buf: String,
    record: Record<T>,
    table: Table<T>,
    pos: Position,
}

impl<T, F> Cursor<T, F>
where
    F: FnMut(String, Position) -> Result<T>,
{
    fn new(finish: F) -> Cursor<T, F> {
        Cursor {
            finish,
            buf: String::new(),
            record: vec![],
            table: vec![],
            pos: Position::new(),
        }
    }

    fn end_field(&mut self) -> Result<()> {
        let raw = mem::replace(&mut self.buf, String::new());
        let value = (self.finish)(raw, self.pos)?;
        self.record.push(value);
        self.pos.col += 1;
        Ok(())
    }

    fn end_record(&mut self) {
        let record = mem::replace(&mut self.record, vec![]);
        self.table.push(record);
        self.pos.row += 1;
        self.pos.col = 1;
    }
}
