use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::result;

use csv_table_core::{IllegalTransition, State, TokenKind};

use crate::reader::Position;

/// A type alias for `Result<T, csv_table::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when processing CSV data.
///
/// This error can happen when parsing or writing CSV data, and when a
/// `Source` fails to deliver the text to parse.
///
/// Note that writing can only fail when a field has no text representation.
/// Parsing with `parse` can only fail on malformed input.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    /// A crate private constructor for `Error`.
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwrap this error into its underlying type.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns true if this is an I/O error.
    ///
    /// If this is true, the underlying `ErrorKind` is guaranteed to be
    /// `ErrorKind::Io`.
    pub fn is_io_error(&self) -> bool {
        match *self.0 {
            ErrorKind::Io(_) => true,
            _ => false,
        }
    }

    /// Returns true if this error was produced by the parser itself, as
    /// opposed to a caller supplied reviver or a source.
    pub fn is_parse_error(&self) -> bool {
        match *self.0 {
            ErrorKind::IllegalState { .. } => true,
            _ => false,
        }
    }

    /// Return the position for this error, if one exists.
    ///
    /// This is a convenience function that permits callers to easily access
    /// the position on an error without doing case analysis on `ErrorKind`.
    pub fn position(&self) -> Option<&Position> {
        match *self.0 {
            ErrorKind::IllegalState { ref pos, .. } => Some(pos),
            ErrorKind::InvalidField { pos: Some(ref pos), .. } => Some(pos),
            ErrorKind::Reviver { ref pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// Attach a position to a field error that does not have one yet.
    pub(crate) fn at(mut self, field_pos: Position) -> Error {
        if let ErrorKind::InvalidField { ref mut pos, .. } = *self.0 {
            if pos.is_none() {
                *pos = Some(field_pos);
            }
        }
        self
    }
}

/// The specific type of an error.
///
/// This enum may grow additional variants, so matches on it outside this
/// crate need a wildcard arm.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The parser met a token that its current state does not admit, e.g.,
    /// a quote inside an unquoted field or text right after the closing
    /// quote of a quoted field.
    IllegalState {
        /// The position of the offending token. The row and column
        /// identify the field that was being built.
        pos: Position,
        /// The state the parser was in.
        state: State,
        /// The kind of token that was rejected.
        token: TokenKind,
    },
    /// A field value has no text representation, e.g., a sequence or a map
    /// given where a single field was expected.
    InvalidField {
        /// The position of the field in the table being written, if known.
        pos: Option<Position>,
        /// A description of why the field was rejected.
        msg: String,
    },
    /// A reviver passed to `Reader::try_parse_with` aborted the parse.
    Reviver {
        /// The position of the field the reviver was called with.
        pos: Position,
        /// The error returned by the reviver.
        err: Box<dyn StdError + Send + Sync>,
    },
    /// A `Source` answered with a non-success status.
    FetchFailure {
        /// The location that was requested.
        location: String,
        /// The status code of the response.
        status: u16,
        /// The status text of the response.
        reason: String,
    },
    /// An I/O error that occurred while fetching or writing CSV data.
    Io(io::Error),
}

pub(crate) fn new_illegal_state(pos: Position, err: IllegalTransition) -> Error {
    Error::new(ErrorKind::IllegalState {
        pos,
        state: err.state,
        token: err.token,
    })
}

pub(crate) fn new_invalid_field<T: fmt::Display>(msg: T) -> Error {
    Error::new(ErrorKind::InvalidField { pos: None, msg: msg.to_string() })
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(ErrorKind::Io(err))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            ErrorKind::Reviver { ref err, .. } => Some(&**err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::IllegalState { ref pos, state, token } => write!(
                f,
                "CSV parse error: row {}, column {} (byte {}): \
                 illegal state, unexpected {} in {}",
                pos.row(),
                pos.col(),
                pos.byte(),
                token,
                state
            ),
            ErrorKind::InvalidField { pos: None, ref msg } => {
                write!(f, "CSV write error: {}", msg)
            }
            ErrorKind::InvalidField { pos: Some(ref pos), ref msg } => write!(
                f,
                "CSV write error: row {}, column {}: {}",
                pos.row(),
                pos.col(),
                msg
            ),
            ErrorKind::Reviver { ref pos, ref err } => write!(
                f,
                "CSV parse error: row {}, column {}: reviver failed: {}",
                pos.row(),
                pos.col(),
                err
            ),
            ErrorKind::FetchFailure { ref location, status, ref reason } => {
                write!(f, "ERR {}: {} ({})", status, reason, location)
            }
            ErrorKind::Io(ref err) => err.fmt(f),
        }
    }
}
