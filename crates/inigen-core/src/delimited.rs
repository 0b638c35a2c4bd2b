//! Delimited line format shared by schema files and configuration files.
//!
//! A line is read field by field up to the active delimiter. Inside a field
//! the two-character [`ESCAPE`] sequence stands for a literal delimiter, so a
//! name or value may contain `=` or `;` without ending the field.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Escape sequence standing for the active delimiter inside a field.
pub const ESCAPE: &str = "$$";

/// Delimiter between a name and the rest of the line.
pub const KEY_DELIMITER: char = '=';

/// Delimiter between the type and the validator of a schema line.
pub const SCHEMA_DELIMITER: char = ';';

/// Characters trimmed around names, types and values.
pub const TRIM_CHARS: [char; 2] = [' ', '\t'];

/// Trim spaces and tabs from both ends of `field`.
pub fn trim(field: &str) -> &str {
    field.trim_matches(TRIM_CHARS)
}

/// Replace every `delimiter` in `field` by the escape sequence.
///
/// The mapping is not reversible for text that already contains `$$`: it
/// reads back as the delimiter. See [`format_pair`].
pub fn escape(field: &str, delimiter: char) -> String {
    field.replace(delimiter, ESCAPE)
}

/// Replace every escape sequence in `field` by `delimiter`.
pub fn unescape(field: &str, delimiter: char) -> String {
    field.replace(ESCAPE, &delimiter.to_string())
}

/// Reads the fields of a single line in order.
///
/// # Example
/// ```
/// use inigen_core::delimited::LineCursor;
///
/// let mut cursor = LineCursor::new("Alpha=int;Alpha() >= 0", '=');
/// assert_eq!(cursor.next_field(), "Alpha");
/// cursor.set_delimiter(';');
/// assert_eq!(cursor.next_field(), "int");
/// assert_eq!(cursor.rest_of_line(), "Alpha() >= 0");
/// ```
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    line: &'a str,
    pos: usize,
    delimiter: char,
}

impl<'a> LineCursor<'a> {
    pub fn new(line: &'a str, delimiter: char) -> Self {
        Self {
            line,
            pos: 0,
            delimiter,
        }
    }

    /// Change the delimiter used by subsequent reads.
    pub fn set_delimiter(&mut self, delimiter: char) {
        self.delimiter = delimiter;
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Read up to the next delimiter and step past it.
    ///
    /// Returns an empty string once the line is exhausted.
    pub fn next_field(&mut self) -> String {
        let rest = &self.line[self.pos..];
        match rest.find(self.delimiter) {
            Some(idx) => {
                self.pos += idx + self.delimiter.len_utf8();
                unescape(&rest[..idx], self.delimiter)
            }
            None => {
                self.pos = self.line.len();
                unescape(rest, self.delimiter)
            }
        }
    }

    /// Everything after the fields read so far, unescaped with the active
    /// delimiter. Does not advance the cursor.
    pub fn rest_of_line(&self) -> String {
        unescape(&self.line[self.pos..], self.delimiter)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.line.len()
    }
}

/// Split a `key=value` line into its raw (untrimmed, unescaped) parts.
pub fn split_pair(line: &str) -> (String, String) {
    let mut cursor = LineCursor::new(line, KEY_DELIMITER);
    let key = cursor.next_field();
    (key, cursor.rest_of_line())
}

/// Iterates over the logical lines of a delimited file.
///
/// Each item is the 1-based line number together with the line text, line
/// ending removed. A blank line ends the iteration unless
/// [`terminate_on_blank_line`](Self::terminate_on_blank_line) is disabled, in
/// which case blank lines are skipped.
pub struct LineReader<R> {
    inner: R,
    terminate_on_blank_line: bool,
    line_number: usize,
    done: bool,
}

impl LineReader<BufReader<fs::File>> {
    /// Open `path` for reading.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            terminate_on_blank_line: true,
            line_number: 0,
            done: false,
        }
    }

    pub fn terminate_on_blank_line(mut self, enabled: bool) -> Self {
        self.terminate_on_blank_line = enabled;
        self
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let mut buf = String::new();
            match self.inner.read_line(&mut buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    self.line_number += 1;
                    let mut line = buf.trim_end_matches(['\n', '\r']);
                    if self.line_number == 1 {
                        line = line.strip_prefix('\u{feff}').unwrap_or(line);
                    }

                    if trim(line).is_empty() {
                        if self.terminate_on_blank_line {
                            self.done = true;
                            return None;
                        }
                        continue;
                    }

                    return Some(Ok((self.line_number, line.to_string())));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Format one line from `key` and `value`, escaping the delimiter in both.
///
/// A literal `$$` in `key` or `value` is written unchanged and therefore
/// reads back as `delimiter`, so such text does not survive a write and a
/// reload.
pub fn format_pair(key: &str, value: &str, delimiter: char) -> String {
    format!(
        "{}{}{}",
        escape(key, delimiter),
        delimiter,
        escape(value, delimiter)
    )
}

/// Replace the contents of `path` with one delimited line per pair.
pub fn write_pairs<'a, I>(path: &Path, pairs: I, delimiter: char) -> io::Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(&format_pair(key, value, delimiter));
        out.push('\n');
    }
    fs::write(path, out)
}
