//! RFC 4180 record reader and writer.
//!
//! The reader pulls whole lines with `read_until` and only keeps reading
//! while a quoted field is still open, so a record costs one buffer and one
//! field vector. It accepts LF or CRLF endings, a leading UTF-8 BOM, blank
//! lines and quoted fields spanning several lines. A record that fails to
//! decode is reported with the line it started on and the reader moves on
//! to the next one.

use std::{
    borrow::Cow,
    io::{self, BufRead, Write},
};

use crate::core::error::{ParseCsvError, ParseErrorKind};

const BOM: &[u8] = b"\xEF\xBB\xBF";
/// Records are written with CRLF terminators.
pub const RECORD_END: &[u8] = b"\r\n";

/// One decoded record and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Record {
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

pub struct CsvReader<R> {
    src: R,
    buf: Vec<u8>,
    line_no: usize,
    started: bool,
    done: bool,
}

impl<R: BufRead> CsvReader<R> {
    pub fn new(src: R) -> Self {
        Self {
            src,
            buf: Vec::with_capacity(256),
            line_no: 0,
            started: false,
            done: false,
        }
    }

    fn io_err(&self, e: io::Error) -> ParseCsvError {
        ParseCsvError {
            line: self.line_no,
            kind: ParseErrorKind::Io(e),
        }
    }

    /// Fill `self.buf` with the raw bytes of the next non-blank record.
    /// Returns the starting line, or `None` at end of input.
    fn read_raw(&mut self) -> Result<Option<usize>, ParseCsvError> {
        loop {
            self.buf.clear();
            let n = self
                .src
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| self.io_err(e))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let start = self.line_no;

            if !self.started {
                self.started = true;
                if self.buf.starts_with(BOM) {
                    self.buf.drain(..BOM.len());
                }
            }

            let mut open = quote_open(&self.buf, false);
            while open {
                let before = self.buf.len();
                let n = self
                    .src
                    .read_until(b'\n', &mut self.buf)
                    .map_err(|e| self.io_err(e))?;
                if n == 0 {
                    return Err(ParseCsvError {
                        line: start,
                        kind: ParseErrorKind::UnterminatedQuote,
                    });
                }
                self.line_no += 1;
                open = quote_open(&self.buf[before..], true);
            }

            trim_line_end(&mut self.buf);
            if !self.buf.is_empty() {
                return Ok(Some(start));
            }
        }
    }
}

impl<R: BufRead> Iterator for CsvReader<R> {
    type Item = Result<Record, ParseCsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_raw() {
            Ok(Some(line)) => Some(split_fields(&self.buf, line).map(|fields| Record { line, fields })),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // an open quote at EOF or a failing reader ends the stream
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Quote state after scanning `chunk`, starting from `open`.
///
/// Follows the same rules as `split_fields`: a quote only opens a field
/// when it is the field's first byte, and a doubled quote inside a quoted
/// field is an escape. Stray quotes in unquoted fields are plain text.
fn quote_open(chunk: &[u8], mut open: bool) -> bool {
    let mut at_field_start = !open;
    let mut i = 0;
    while i < chunk.len() {
        let b = chunk[i];
        if open {
            if b == b'"' {
                if chunk.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else {
                    open = false;
                }
            }
        } else {
            match b {
                b',' => {
                    at_field_start = true;
                    i += 1;
                    continue;
                }
                b'"' if at_field_start => open = true,
                _ => {}
            }
        }
        at_field_start = false;
        i += 1;
    }
    open
}

#[inline]
fn trim_line_end(buf: &mut Vec<u8>) {
    if buf.ends_with(b"\n") {
        buf.pop();
    }
    if buf.ends_with(b"\r") {
        buf.pop();
    }
}

fn split_fields(raw: &[u8], line: usize) -> Result<Vec<String>, ParseCsvError> {
    let mut fields = Vec::with_capacity(4);
    let mut field = Vec::<u8>::with_capacity(raw.len());
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut i = 0;

    let finish = |field: &mut Vec<u8>| {
        String::from_utf8(std::mem::take(field)).map_err(|_| ParseCsvError {
            line,
            kind: ParseErrorKind::InvalidUtf8,
        })
    };

    while i < raw.len() {
        let b = raw[i];
        if in_quotes {
            if b == b'"' {
                if raw.get(i + 1) == Some(&b'"') {
                    field.push(b'"');
                    i += 1;
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(b);
            }
        } else {
            match b {
                b',' => {
                    fields.push(finish(&mut field)?);
                    at_field_start = true;
                    i += 1;
                    continue;
                }
                b'"' if at_field_start => in_quotes = true,
                _ => field.push(b),
            }
        }
        at_field_start = false;
        i += 1;
    }
    fields.push(finish(&mut field)?);
    Ok(fields)
}

/// Quote `field` only when it carries a delimiter, quote or line break.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write one CRLF-terminated record.
pub fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(quote_field(f).as_bytes())?;
    }
    out.write_all(RECORD_END)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &[u8]) -> Vec<Result<Record, ParseCsvError>> {
        CsvReader::new(Cursor::new(text.to_vec())).collect()
    }

    fn fields(r: &Result<Record, ParseCsvError>) -> Vec<&str> {
        r.as_ref().unwrap().fields.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_plain_records_crlf_and_lf() {
        let out = read(b"a,b,c\r\n1,2,3\n4,5,\n");
        assert_eq!(out.len(), 3);
        assert_eq!(fields(&out[0]), ["a", "b", "c"]);
        assert_eq!(fields(&out[1]), ["1", "2", "3"]);
        assert_eq!(fields(&out[2]), ["4", "5", ""]);
    }

    #[test]
    fn test_quoted_fields_with_commas_quotes_newlines() {
        let out = read(b"t,7,\"one, two\"\r\nt,8,\"say \"\"hi\"\"\"\r\nt,9,\"line1\r\nline2\"\r\nt,1,last\r\n");
        assert_eq!(fields(&out[0]), ["t", "7", "one, two"]);
        assert_eq!(fields(&out[1]), ["t", "8", "say \"hi\""]);
        assert_eq!(fields(&out[2]), ["t", "9", "line1\r\nline2"]);
        // the multi-line record consumed lines 3-4
        assert_eq!(out[3].as_ref().unwrap().line, 5);
    }

    #[test]
    fn test_bom_and_blank_lines_skipped() {
        let out = read(b"\xEF\xBB\xBFtimestamp,score\n\n\r\nx,1\n");
        assert_eq!(out.len(), 2);
        assert_eq!(fields(&out[0]), ["timestamp", "score"]);
        assert_eq!(out[1].as_ref().unwrap().line, 4);
    }

    #[test]
    fn test_unterminated_quote_reports_start_line() {
        let out = read(b"a,b\nx,\"never closed\nmore\n");
        assert_eq!(out.len(), 2);
        let err = out[1].as_ref().unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ParseErrorKind::UnterminatedQuote));
    }

    #[test]
    fn test_invalid_utf8_does_not_stop_reader() {
        let out = read(b"a,\xFF\nb,ok\n");
        assert!(matches!(
            out[0].as_ref().unwrap_err().kind,
            ParseErrorKind::InvalidUtf8
        ));
        assert_eq!(fields(&out[1]), ["b", "ok"]);
    }

    #[test]
    fn test_writer_quotes_minimally() {
        let mut out = Vec::new();
        write_record(&mut out, &["2026-01-01T00:00:00+00:00", "7", "feeling okay"]).unwrap();
        write_record(&mut out, &["t", "3", "rain, \"again\"\nugh"]).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "2026-01-01T00:00:00+00:00,7,feeling okay\r\nt,3,\"rain, \"\"again\"\"\nugh\"\r\n"
        );
        let back = read(&out);
        assert_eq!(fields(&back[1]), ["t", "3", "rain, \"again\"\nugh"]);
    }

    #[test]
    fn test_stray_quote_in_unquoted_field_stays_on_its_line() {
        let out = read(b"t,5,he said \"hi\r\nt,6,fine\r\nt,7,\"x\"y\"\r\nt,8,last\r\n");
        assert_eq!(out.len(), 4);
        assert_eq!(fields(&out[0]), ["t", "5", "he said \"hi"]);
        assert_eq!(fields(&out[1]), ["t", "6", "fine"]);
        assert_eq!(fields(&out[2]), ["t", "7", "xy\""]);
        assert_eq!(out[3].as_ref().unwrap().line, 4);
    }

    #[test]
    fn test_quote_state_tracks_field_starts() {
        assert!(!quote_open(b"a,b\"c,d\n", false));
        assert!(quote_open(b"a,\"open\n", false));
        assert!(!quote_open(b"still \"\" inside\" then,\n", true));
        assert!(quote_open(b"a,\"x\"\"\n", false));
    }
}
