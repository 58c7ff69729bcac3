use core::fmt;

use memchr::{memchr, memchr3};

/// A single token of CSV text.
///
/// Every token borrows from the input. Since all structural bytes are ASCII,
/// token boundaries always fall on `char` boundaries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    /// A single `"`.
    Quote,
    /// A single `,`.
    Delimiter,
    /// One record terminator: `\r\n`, `\n` or `\r`.
    Newline(&'a str),
    /// A maximal run of bytes that are not a quote, delimiter or newline.
    Plain(&'a str),
}

impl<'a> Token<'a> {
    /// The kind of this token, without its text.
    pub fn kind(&self) -> TokenKind {
        match *self {
            Token::Quote => TokenKind::Quote,
            Token::Delimiter => TokenKind::Delimiter,
            Token::Newline(_) => TokenKind::Newline,
            Token::Plain(_) => TokenKind::Plain,
        }
    }

    /// The exact input text this token was produced from.
    pub fn as_str(&self) -> &'a str {
        match *self {
            Token::Quote => "\"",
            Token::Delimiter => ",",
            Token::Newline(nl) => nl,
            Token::Plain(run) => run,
        }
    }
}

/// The class of a token, used when reporting illegal transitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// A quote character.
    Quote,
    /// A field delimiter.
    Delimiter,
    /// A record terminator.
    Newline,
    /// A run of ordinary text.
    Plain,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            TokenKind::Quote => "quote",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Newline => "newline",
            TokenKind::Plain => "text",
        };
        f.write_str(name)
    }
}

/// A maximal-munch tokenizer over CSV text.
///
/// At each position the lexer tries, in order: a quote, a delimiter, a
/// newline sequence (`\r\n` before `\r`) and finally the longest run of
/// bytes that are none of those. It is anchored at the current position and
/// never skips input, so concatenating the text of all tokens reproduces the
/// input exactly.
///
/// Items are `(offset, token)` pairs, where `offset` is the byte offset of
/// the token in the input.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer { input, pos: 0 }
    }

    /// The byte offset of the next token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The input that has not been tokenized yet.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<(usize, Token<'a>)> {
        let rest = self.remaining();
        let bytes = rest.as_bytes();
        let start = self.pos;
        let (token, len) = match *bytes.first()? {
            b'"' => (Token::Quote, 1),
            b',' => (Token::Delimiter, 1),
            b'\r' if bytes.get(1) == Some(&b'\n') => {
                (Token::Newline(&rest[..2]), 2)
            }
            b'\r' | b'\n' => (Token::Newline(&rest[..1]), 1),
            _ => {
                let end = plain_run_len(bytes);
                (Token::Plain(&rest[..end]), end)
            }
        };
        self.pos += len;
        Some((start, token))
    }
}

/// Returns the length of the plain run at the start of `bytes`.
///
/// `bytes` must not start with a structural byte, so the result is never
/// zero for non-empty input.
#[inline]
fn plain_run_len(bytes: &[u8]) -> usize {
    let end = memchr3(b'"', b',', b'\n', bytes).unwrap_or(bytes.len());
    memchr(b'\r', &bytes[..end]).unwrap_or(end)
}
