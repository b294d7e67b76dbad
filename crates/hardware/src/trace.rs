//! Trace input.
//!
//! A trace is line-oriented text, one reference per line:
//!
//! ```text
//! # comment
//! I 0x00400000
//! D 7fff0010
//! ```
//!
//! The first field is the access kind (`I` for instruction fetch, `D`, `L` or `S` for
//! data), the second the address in hexadecimal with an optional `0x` prefix. Further
//! fields are ignored, as are blank lines and lines starting with `#`.

use std::io::BufRead;

use crate::common::{AccessKind, TraceError};

/// One reference from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Which first-level cache serves the reference.
    pub kind: AccessKind,
    /// Referenced address.
    pub addr: u32,
}

impl TraceRecord {
    /// Creates a record.
    pub const fn new(kind: AccessKind, addr: u32) -> Self {
        Self { kind, addr }
    }
}

/// Parses one trace line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] tagged with `line_no` when the kind or address
/// is missing or malformed.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceRecord>, TraceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let err = |reason: String| TraceError::Parse {
        line: line_no,
        reason,
    };

    let mut fields = line.split_whitespace();
    let kind_field = fields.next().unwrap_or_default();
    let mut chars = kind_field.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(c), None) => AccessKind::from_code(c),
        _ => None,
    }
    .ok_or_else(|| err(format!("unknown access kind `{kind_field}`")))?;

    let addr_field = fields
        .next()
        .ok_or_else(|| err("missing address".to_owned()))?;
    let digits = addr_field
        .strip_prefix("0x")
        .or_else(|| addr_field.strip_prefix("0X"))
        .unwrap_or(addr_field);
    let addr = u32::from_str_radix(digits, 16)
        .map_err(|e| err(format!("bad address `{addr_field}`: {e}")))?;

    Ok(Some(TraceRecord::new(kind, addr)))
}

/// Iterator over the records of a trace.
///
/// Yields records in file order and stops at the first I/O error or malformed
/// line after reporting it.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
    failed: bool,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
            failed: false,
        }
    }

    /// Number of lines consumed so far.
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    match parse_line(&self.buf, self.line_no) {
                        Ok(Some(record)) => return Some(Ok(record)),
                        Ok(None) => {}
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        }
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
