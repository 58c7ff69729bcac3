/*!
`csv-table-core` provides the allocation free pieces of `csv-table`: a
maximal-munch lexer, the four state parser machine that consumes its tokens
and a field writer that escapes into any `core::fmt::Write`.

Nothing here owns a buffer. The lexer borrows its input, the machine only
tells the caller what to do with each token and the writer streams into a
sink chosen by the caller. Assembling fields, records and tables is left to
the `csv-table` crate.

# Example

Splitting a record into fields by driving the machine by hand:

```
use csv_table_core::{Action, Lexer, Reader};

let mut rdr = Reader::new();
let mut fields = vec![];
let mut field = String::new();
for (_, token) in Lexer::new("a,\"b,c\"\n") {
    match rdr.feed(token).unwrap() {
        Action::Nothing => {}
        Action::Append(text) => field.push_str(text),
        Action::EndField { .. } => fields.push(std::mem::take(&mut field)),
    }
}
assert_eq!(fields, vec!["a", "b,c"]);
```
*/

#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

pub use crate::lexer::{Lexer, Token, TokenKind};
pub use crate::reader::{Action, IllegalTransition, Reader, State};
pub use crate::writer::{needs_quotes, QuoteStyle, Writer};

mod lexer;
mod reader;
mod writer;
