use crate::reader::Record;

/// A header/body projection of a table, as consumed by renderers.
///
/// The parser treats every record alike. Renderers conventionally show the
/// first record as a header row, unless told the data has no headers.
///
/// # Example
///
/// ```
/// use csv_table::TableView;
///
/// let table = csv_table::parse("name,age\nann,41\nbob,7").unwrap();
///
/// let view = TableView::new(&table, true);
/// assert_eq!(view.headers().unwrap(), &["name", "age"]);
/// assert_eq!(view.rows().len(), 2);
///
/// let view = TableView::new(&table, false);
/// assert!(view.headers().is_none());
/// assert_eq!(view.rows().len(), 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TableView<'t, T> {
    headers: Option<&'t [T]>,
    rows: &'t [Record<T>],
}

impl<'t, T> TableView<'t, T> {
    /// Split `table` into an optional header record and body rows.
    ///
    /// When `has_headers` is true and the table is not empty, the first
    /// record becomes the header.
    pub fn new(table: &'t [Record<T>], has_headers: bool) -> TableView<'t, T> {
        match table.split_first() {
            Some((first, rest)) if has_headers => {
                TableView { headers: Some(first), rows: rest }
            }
            _ => TableView { headers: None, rows: table },
        }
    }

    /// The header record, if any.
    pub fn headers(&self) -> Option<&'t [T]> {
        self.headers
    }

    /// The body rows.
    pub fn rows(&self) -> &'t [Record<T>] {
        self.rows
    }

    /// The number of columns: the length of the widest record, header
    /// included.
    pub fn width(&self) -> usize {
        let body = self.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        self.headers.map_or(0, |h| h.len()).max(body)
    }
}
