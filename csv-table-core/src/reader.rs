use core::fmt;

use crate::lexer::{Token, TokenKind};

/// The state of the parser machine.
///
/// The machine starts in `StartOfField` and returns to it after every
/// field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// At the beginning of a field.
    StartOfField,
    /// Inside a field that did not start with a quote.
    Unquoted,
    /// Inside a quoted field. Delimiters and newlines are literal here.
    Quoted,
    /// A quote was seen inside a quoted field. The next token decides
    /// whether it was an escaped quote or the end of the field.
    QuoteSeen,
}

impl Default for State {
    fn default() -> State {
        State::StartOfField
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            State::StartOfField => "start of field",
            State::Unquoted => "unquoted field",
            State::Quoted => "quoted field",
            State::QuoteSeen => "quote in quoted field",
        };
        f.write_str(name)
    }
}

/// What the caller must do in response to a token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action<'a> {
    /// Nothing to record.
    Nothing,
    /// Append the given text to the field being built.
    Append(&'a str),
    /// The field being built is complete.
    ///
    /// If `record_end` is true, the record is also complete.
    EndField {
        /// Whether this field was terminated by a newline.
        record_end: bool,
    },
}

/// The error returned when a token is not admitted by the current state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IllegalTransition {
    /// The state the machine was in.
    pub state: State,
    /// The kind of token that was rejected.
    pub token: TokenKind,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected {} in {}", self.token, self.state)
    }
}

/// A pull based CSV parser machine.
///
/// The machine consumes tokens produced by a `Lexer` and reports, for each
/// one, the `Action` the caller must take. It never copies field data and
/// keeps no state besides its current `State`.
///
/// # RFC 4180
///
/// Quoted fields may contain delimiters and any newline sequence, which are
/// kept verbatim, and a doubled quote stands for one literal quote. Unlike
/// many lenient readers, a quote inside an unquoted field or text right
/// after a closing quote is an error.
#[derive(Clone, Debug, Default)]
pub struct Reader {
    state: State,
}

impl Reader {
    /// Create a new machine in the `StartOfField` state.
    pub fn new() -> Reader {
        Reader::default()
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Reset the machine to its initial state.
    pub fn reset(&mut self) {
        self.state = State::StartOfField;
    }

    /// Feed the next token to the machine.
    ///
    /// On success, the machine moves to its next state and returns the action
    /// the caller must perform. If the token is not admitted by the current
    /// state, an error is returned and the state is left unchanged.
    pub fn feed<'a>(
        &mut self,
        token: Token<'a>,
    ) -> Result<Action<'a>, IllegalTransition> {
        let (next, action) = self.transition(token)?;
        self.state = next;
        Ok(action)
    }

    /// Signal the end of input.
    ///
    /// Returns true if a field was in progress, i.e., the caller holds a
    /// field that has not been ended yet. The machine is reset either way.
    pub fn finish(&mut self) -> bool {
        let in_field = self.state != State::StartOfField;
        self.reset();
        in_field
    }

    #[inline]
    fn transition<'a>(
        &self,
        token: Token<'a>,
    ) -> Result<(State, Action<'a>), IllegalTransition> {
        use self::State::*;

        let end_field = Action::EndField { record_end: false };
        let end_record = Action::EndField { record_end: true };
        Ok(match (self.state, token) {
            (StartOfField, Token::Quote) => (Quoted, Action::Nothing),
            (StartOfField, Token::Delimiter) => (StartOfField, end_field),
            (StartOfField, Token::Newline(_)) => (StartOfField, end_record),
            (StartOfField, Token::Plain(run)) => (Unquoted, Action::Append(run)),

            (Unquoted, Token::Delimiter) => (StartOfField, end_field),
            (Unquoted, Token::Newline(_)) => (StartOfField, end_record),
            // Two plain runs cannot be adjacent under maximal munch, but
            // the transition is still rejected if a caller feeds them.
            (Unquoted, Token::Quote) | (Unquoted, Token::Plain(_)) => {
                return Err(self.illegal(token));
            }

            (Quoted, Token::Quote) => (QuoteSeen, Action::Nothing),
            (Quoted, tok) => (Quoted, Action::Append(tok.as_str())),

            (QuoteSeen, Token::Quote) => (Quoted, Action::Append("\"")),
            (QuoteSeen, Token::Delimiter) => (StartOfField, end_field),
            (QuoteSeen, Token::Newline(_)) => (StartOfField, end_record),
            (QuoteSeen, Token::Plain(_)) => return Err(self.illegal(token)),
        })
    }

    fn illegal(&self, token: Token) -> IllegalTransition {
        IllegalTransition { state: self.state, token: token.kind() }
    }
}
