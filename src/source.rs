/*!
The boundary between the parser and whatever supplies its text.

A `Source` answers a location with a status and a body, in the manner of an
HTTP response. `load` refuses to parse anything but a success, so callers can
always tell a failed fetch (`ErrorKind::FetchFailure`) apart from malformed
CSV (`ErrorKind::IllegalState`).
*/

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::reader::{Reader, Table};
use crate::value::Value;

/// The answer of a `Source` to a request for CSV text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    status: u16,
    status_text: String,
    body: String,
}

impl Response {
    /// Create a response with an arbitrary status.
    pub fn new<S, B>(status: u16, status_text: S, body: B) -> Response
    where
        S: Into<String>,
        B: Into<String>,
    {
        Response {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// A `200 OK` response carrying `body`.
    pub fn ok<B: Into<String>>(body: B) -> Response {
        Response::new(200, "OK", body)
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The status text, e.g., `Not Found`.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Consume the response, returning its body.
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Something that can supply CSV text for a location.
///
/// Implementations report "not there" style failures as a `Response`
/// with a non-success status, and reserve `io::Error` for failures of the
/// transport itself.
pub trait Source {
    /// Fetch the text at `location`.
    fn fetch(&self, location: &str) -> io::Result<Response>;
}

impl<'a, S: Source + ?Sized> Source for &'a S {
    fn fetch(&self, location: &str) -> io::Result<Response> {
        (**self).fetch(location)
    }
}

/// A `Source` that reads files below a root directory.
///
/// Locations are relative paths. A missing file is answered with
/// `404 Not Found` and a file that cannot be read for lack of permission
/// with `403 Forbidden`. Locations that try to leave the root are answered
/// with `400 Bad Request`.
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Create a source serving files below `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> FileSource {
        FileSource { root: root.as_ref().to_path_buf() }
    }

    /// The directory locations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, location: &str) -> Option<PathBuf> {
        let rel = Path::new(location);
        let escapes = rel.components().any(|c| match c {
            Component::Normal(_) | Component::CurDir => false,
            _ => true,
        });
        if escapes {
            None
        } else {
            Some(self.root.join(rel))
        }
    }
}

impl Source for FileSource {
    fn fetch(&self, location: &str) -> io::Result<Response> {
        let path = match self.resolve(location) {
            Some(path) => path,
            None => return Ok(Response::new(400, "Bad Request", "")),
        };
        match fs::read_to_string(&path) {
            Ok(body) => Ok(Response::ok(body)),
            Err(ref err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Response::new(404, "Not Found", ""))
            }
            Err(ref err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Ok(Response::new(403, "Forbidden", ""))
            }
            Err(err) => Err(err),
        }
    }
}

/// Fetch the text at `location` from `source` and parse it with `rdr`.
///
/// A non-success response is returned as `ErrorKind::FetchFailure` before
/// the parser ever runs. Transport failures are returned as
/// `ErrorKind::Io`.
///
/// # Example
///
/// ```
/// use csv_table::{load, Reader, Response, Source};
///
/// struct Fixed;
///
/// impl Source for Fixed {
///     fn fetch(&self, _: &str) -> std::io::Result<Response> {
///         Ok(Response::ok("a,b\n1,2\n"))
///     }
/// }
///
/// let table = load(&Fixed, "anything.csv", &Reader::new()).unwrap();
/// assert_eq!(table.len(), 2);
/// ```
pub fn load<S: Source + ?Sized>(
    source: &S,
    location: &str,
    rdr: &Reader,
) -> Result<Table<Value>> {
    let resp = source.fetch(location)?;
    debug!("fetched {}: {} {}", location, resp.status(), resp.status_text());
    if !resp.is_success() {
        return Err(Error::new(ErrorKind::FetchFailure {
            location: location.to_string(),
            status: resp.status(),
            reason: resp.status_text().to_string(),
        }));
    }
    rdr.parse(resp.body())
}
