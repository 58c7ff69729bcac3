/*!
The `csv-table` crate parses CSV text into tables of fields and writes tables
back out as CSV text.

Parsing is a single pass over a complete `&str`: a maximal-munch lexer feeds
a four state machine (see the `csv-table-core` crate) and a per-call cursor
assembles fields, records and the table. Quoted fields may contain commas,
doubled quotes and any of the `\n`, `\r\n` and `\r` newlines, which are also
all recognized as record terminators outside of quotes. Records may have
differing numbers of fields.

# Brief overview

* `parse` returns a `Table` of `String` fields.
* `parse_typed` infers booleans, integers and floats (see `infer_type`).
* `ReaderBuilder` builds a `Reader`, which can also pass every field through
  a caller supplied reviver with its `Position`.
* `stringify` and `WriterBuilder` write any table of serde scalars back out,
  quoting only when necessary.
* `load` fetches text from a `Source` and parses it, keeping fetch failures
  distinct from parse errors.
* `TableView` splits off the conventional header row for renderers.

Malformed input, such as a quote in the middle of an unquoted field, fails
the whole parse with `ErrorKind::IllegalState`, reporting the row and column
of the field being built.

# Example

```
use csv_table::{ReaderBuilder, Value, WriterBuilder};

let rdr = ReaderBuilder::new().typed(true).build();
let table = rdr.parse("city,pop\n\"Boston, MA\",4628910\n").unwrap();
assert_eq!(table[1], vec![Value::from("Boston, MA"), Value::Int(4628910)]);

let wtr = WriterBuilder::new().eof(false).build();
assert_eq!(
    wtr.stringify(&table).unwrap(),
    "city,pop\n\"Boston, MA\",4628910",
);
```
*/

#![deny(missing_docs)]

pub use csv_table_core::{State, TokenKind};

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::reader::{
    parse, parse_typed, ParseOptions, Position, Reader, ReaderBuilder,
    Record, Table,
};
pub use crate::source::{load, FileSource, Response, Source};
pub use crate::value::{infer_type, Value};
pub use crate::view::TableView;
pub use crate::writer::{
    stringify, WriteOptions, Writer, WriterBuilder,
};

mod error;
mod reader;
mod serializer;
pub mod source;
mod value;
mod view;
mod writer;
