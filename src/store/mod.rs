//! Append-only CSV mood log.
//!
//! The log is a single file with the header `timestamp,score,note`. Writes
//! only ever append; the one exception is the start-up upgrade of files
//! written by older versions (`date,score,message[,note]`), which is done
//! through a temporary file and leaves a `.bak` copy of the original.
//!
//! Malformed rows are skipped on read and logged; they are never rewritten
//! or dropped from disk by normal operation.

pub mod csv;

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::core::{
    config::AppConfig,
    constants::CSV_HEADER,
    entry::{MoodEntry, Score, parse_int, parse_timestamp},
    error::{ParseCsvError, ParseErrorKind, StoreError},
};

use self::csv::{CsvReader, Record, write_record};

/// Result of a lenient read: the good rows plus why the others were skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entries: Vec<MoodEntry>,
    pub skipped: Vec<ParseCsvError>,
}

/// What `ensure_schema` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    Created,
    Current,
    /// Rewritten in the canonical layout. `unparsed` rows could not be
    /// converted and were carried over with their raw field text.
    Upgraded {
        rows: usize,
        unparsed: usize,
        backup: PathBuf,
    },
    /// A legacy file that could not be rewritten without losing data; it
    /// is still readable by column name.
    Kept { reason: String },
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    timestamp: usize,
    score: usize,
    note: Option<usize>,
}

impl Columns {
    const CANONICAL: Self = Self {
        timestamp: 0,
        score: 1,
        note: Some(2),
    };

    fn from_header(rec: &Record) -> Result<Self, ParseCsvError> {
        let find = |names: &[&str]| {
            rec.fields
                .iter()
                .position(|f| names.iter().any(|n| f.trim().eq_ignore_ascii_case(n)))
        };
        let missing = |col| ParseCsvError {
            line: rec.line,
            kind: ParseErrorKind::MissingColumn(col),
        };
        Ok(Self {
            timestamp: find(&["timestamp", "date"]).ok_or_else(|| missing("timestamp"))?,
            score: find(&["score"]).ok_or_else(|| missing("score"))?,
            note: find(&["note"]),
        })
    }

    fn parse(self, rec: &Record) -> Result<MoodEntry, ParseCsvError> {
        let err = |kind| ParseCsvError {
            line: rec.line,
            kind,
        };
        let ts_text = rec
            .get(self.timestamp)
            .ok_or_else(|| err(ParseErrorKind::MissingColumn("timestamp")))?;
        let timestamp = parse_timestamp(ts_text)
            .ok_or_else(|| err(ParseErrorKind::BadTimestamp(ts_text.to_owned())))?;

        let score_text = rec
            .get(self.score)
            .ok_or_else(|| err(ParseErrorKind::MissingColumn("score")))?;
        let score = parse_int(score_text)
            .and_then(|n| Score::try_from(n).ok())
            .ok_or_else(|| err(ParseErrorKind::BadScore(score_text.to_owned())))?;

        let note = self.note.and_then(|i| rec.get(i)).unwrap_or_default();
        Ok(MoodEntry::at(timestamp, score, note))
    }
}

/// Names recognised in a header row.
const KNOWN_COLUMNS: [&str; 5] = ["timestamp", "date", "score", "note", "message"];

/// A first record is a header only if it names a column we know; anything
/// else is data, even when it fails to parse.
#[inline]
fn is_header(rec: &Record) -> bool {
    rec.fields
        .iter()
        .any(|f| KNOWN_COLUMNS.iter().any(|k| f.trim().eq_ignore_ascii_case(k)))
}

#[inline]
fn is_canonical_header(rec: &Record) -> bool {
    rec.fields.len() == CSV_HEADER.len()
        && rec
            .fields
            .iter()
            .zip(CSV_HEADER)
            .all(|(f, h)| f.trim().eq_ignore_ascii_case(h))
}

/// Owner of the CSV file.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(&cfg.log_path)
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_parent(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).map_err(StoreError::io(dir))
            }
            _ => Ok(()),
        }
    }

    /// Append one record, creating the file and header row when absent.
    pub fn append(&self, entry: &MoodEntry) -> Result<(), StoreError> {
        self.create_parent()?;
        let wrap = StoreError::io(&self.path);
        let res = (|| -> io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&self.path)?;
            let len = file.metadata()?.len();

            // build the whole write up front so it lands in one call
            let mut out = Vec::with_capacity(128);
            if len == 0 {
                write_record(&mut out, &CSV_HEADER)?;
            } else if !ends_with_newline(&mut file, len)? {
                out.extend_from_slice(csv::RECORD_END);
            }
            let score = entry.score.to_string();
            write_record(
                &mut out,
                &[entry.timestamp_field().as_str(), score.as_str(), entry.note.as_str()],
            )?;
            file.write_all(&out)?;
            file.flush()
        })();
        res.map_err(wrap)?;
        tracing::debug!(path = %self.path.display(), score = entry.score.get(), "appended entry");
        Ok(())
    }

    /// Every parsable row in file order. Malformed rows are skipped.
    pub fn read_all(&self) -> Result<Vec<MoodEntry>, StoreError> {
        self.read_report().map(|r| r.entries)
    }

    /// Like `read_all`, but also returns the reasons rows were skipped.
    pub fn read_report(&self) -> Result<LoadReport, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadReport::default()),
            Err(e) => return Err(StoreError::io(&self.path)(e)),
        };

        let mut report = LoadReport::default();
        let mut columns: Option<Columns> = None;

        for rec in CsvReader::new(BufReader::new(file)) {
            let rec = match rec {
                Ok(r) => r,
                Err(ParseCsvError {
                    kind: ParseErrorKind::Io(source),
                    ..
                }) => {
                    return Err(StoreError::Io {
                        path: self.path.clone(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "skipping row");
                    report.skipped.push(e);
                    continue;
                }
            };

            let cols = if let Some(c) = columns {
                c
            } else if is_header(&rec) {
                let c = Columns::from_header(&rec).unwrap_or_else(|e| {
                    tracing::warn!(path = %self.path.display(), error = %e, "unusable header, assuming timestamp,score,note");
                    report.skipped.push(e);
                    Columns::CANONICAL
                });
                columns = Some(c);
                continue;
            } else {
                columns = Some(Columns::CANONICAL);
                Columns::CANONICAL
            };

            match cols.parse(&rec) {
                Ok(entry) => report.entries.push(entry),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "skipping row");
                    report.skipped.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Entries logged on the given local date.
    pub fn entries_on(&self, date: NaiveDate) -> Result<Vec<MoodEntry>, StoreError> {
        let mut all = self.read_all()?;
        all.retain(|e| e.date() == date);
        Ok(all)
    }

    /// Make sure the file exists with the current header, upgrading files
    /// written by older versions.
    pub fn ensure_schema(&self) -> Result<SchemaStatus, StoreError> {
        self.create_parent()?;
        let first = match File::open(&self.path) {
            Ok(f) => CsvReader::new(BufReader::new(f)).next(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::io(&self.path)(e)),
        };

        let header = match first {
            None => {
                self.write_fresh(&[])?;
                tracing::info!(path = %self.path.display(), "created mood log");
                return Ok(SchemaStatus::Created);
            }
            // leave unreadable files alone; rows get reported on read
            Some(Err(_)) => return Ok(SchemaStatus::Current),
            Some(Ok(rec)) => rec,
        };

        if is_canonical_header(&header) || !is_header(&header) {
            return Ok(SchemaStatus::Current);
        }
        match Columns::from_header(&header) {
            Ok(columns) => self.upgrade(columns),
            Err(e) => Ok(self.keep(e.to_string())),
        }
    }

    fn keep(&self, reason: String) -> SchemaStatus {
        tracing::warn!(path = %self.path.display(), %reason, "legacy mood log left as is");
        SchemaStatus::Kept { reason }
    }

    /// Rewrite a legacy file row by row. Rows that parse are normalised;
    /// the rest keep their raw text in the canonical positions, so they
    /// stay on disk and are still reported on every read.
    fn upgrade(&self, columns: Columns) -> Result<SchemaStatus, StoreError> {
        let file = File::open(&self.path).map_err(StoreError::io(&self.path))?;
        let mut rows: Vec<[String; 3]> = Vec::new();
        let mut unparsed = 0;

        for rec in CsvReader::new(BufReader::new(file)).skip(1) {
            let rec = match rec {
                Ok(r) => r,
                Err(ParseCsvError {
                    kind: ParseErrorKind::Io(source),
                    ..
                }) => {
                    return Err(StoreError::Io {
                        path: self.path.clone(),
                        source,
                    });
                }
                // the raw bytes of such a record cannot be reproduced
                Err(e) => return Ok(self.keep(e.to_string())),
            };
            match columns.parse(&rec) {
                Ok(entry) => rows.push(canonical_row(&entry)),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "carrying row over unconverted");
                    let raw = |idx: Option<usize>| {
                        idx.and_then(|i| rec.get(i)).unwrap_or_default().to_owned()
                    };
                    rows.push([
                        raw(Some(columns.timestamp)),
                        raw(Some(columns.score)),
                        raw(columns.note),
                    ]);
                    unparsed += 1;
                }
            }
        }

        let backup = self.path.with_extension("csv.bak");
        fs::copy(&self.path, &backup).map_err(StoreError::io(&backup))?;
        self.write_fresh(&rows)?;
        tracing::info!(
            path = %self.path.display(),
            rows = rows.len(),
            unparsed,
            backup = %backup.display(),
            "upgraded legacy mood log"
        );
        Ok(SchemaStatus::Upgraded {
            rows: rows.len(),
            unparsed,
            backup,
        })
    }

    /// Replace the log with `rows` via a temp file + rename.
    fn write_fresh(&self, rows: &[[String; 3]]) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("csv.tmp");
        let res = (|| -> io::Result<()> {
            let mut out = Vec::with_capacity(64 * (rows.len() + 1));
            write_record(&mut out, &CSV_HEADER)?;
            for [ts, score, note] in rows {
                write_record(&mut out, &[ts.as_str(), score.as_str(), note.as_str()])?;
            }
            let mut f = File::create(&tmp)?;
            f.write_all(&out)?;
            f.sync_all()
        })();
        res.map_err(StoreError::io(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(StoreError::io(&self.path))
    }
}

fn canonical_row(e: &MoodEntry) -> [String; 3] {
    [e.timestamp_field(), e.score.to_string(), e.note.clone()]
}

fn ends_with_newline(file: &mut File, len: u64) -> io::Result<bool> {
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
