//! Store image loading
//!
//! Lines are decoded one at a time. A line that fails to decode is skipped
//! and recorded as a diagnostic; it never aborts the load of the lines
//! around it. When an id appears more than once the later line wins.

use std::collections::BTreeMap;
use std::fmt;

use crate::observability::{log_event_with_fields, Event};
use crate::record::{decode, encode, EntryFormat, ParseError, Record};

/// A skipped line and why it was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDiagnostic {
    /// 1-based line number in the store file
    pub line: usize,
    /// Decode failure for that line
    pub reason: ParseError,
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Outcome of decoding a store image
#[derive(Debug, Default)]
pub struct Loaded {
    pub records: BTreeMap<i64, Record>,
    pub diagnostics: Vec<LoadDiagnostic>,
    /// Lines whose id replaced an earlier line's record
    pub replaced: usize,
}

/// Decodes a whole store image. Blank lines are ignored.
pub fn parse_image(contents: &str, format: EntryFormat, origin: &str) -> Loaded {
    let mut loaded = Loaded::default();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line, format) {
            Ok(record) => {
                if loaded.records.insert(record.id(), record).is_some() {
                    loaded.replaced += 1;
                }
            }
            Err(reason) => {
                let diagnostic = LoadDiagnostic {
                    line: idx + 1,
                    reason,
                };
                let line_no = diagnostic.line.to_string();
                let reason = diagnostic.reason.to_string();
                log_event_with_fields(
                    Event::EntrySkipped,
                    &[
                        ("line", line_no.as_str()),
                        ("path", origin),
                        ("reason", reason.as_str()),
                    ],
                );
                loaded.diagnostics.push(diagnostic);
            }
        }
    }

    loaded
}

/// Encodes the full record set, one line per record in id order.
pub fn render_image<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    format: EntryFormat,
) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&encode(record, format));
        out.push('\n');
    }
    out
}
