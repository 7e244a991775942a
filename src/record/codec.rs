//! Entry codec: one record <-> one line
//!
//! Two line formats are supported:
//!
//! - `delimited`: `id|name|quantity|price`. Backslash, `|`, newline and
//!   carriage return inside names are escaped so the format stays lossless.
//! - `json-lines`: one JSON object per line with the same four fields.
//!
//! Lines are returned without the trailing newline; the writer adds it.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::json;

use super::errors::ParseError;
use super::item::Record;

/// Field separator for the delimited format
pub const DELIMITER: char = '|';

const FIELD_COUNT: usize = 4;

/// On-disk line format of a store file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryFormat {
    #[default]
    Delimited,
    JsonLines,
}

impl EntryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryFormat::Delimited => "delimited",
            EntryFormat::JsonLines => "json-lines",
        }
    }
}

impl fmt::Display for EntryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delimited" => Ok(EntryFormat::Delimited),
            "json-lines" => Ok(EntryFormat::JsonLines),
            other => Err(format!(
                "unknown entry format '{}', expected 'delimited' or 'json-lines'",
                other
            )),
        }
    }
}

/// Encodes a record as a single line (no trailing newline).
pub fn encode(record: &Record, format: EntryFormat) -> String {
    match format {
        EntryFormat::Delimited => format!(
            "{}{d}{}{d}{}{d}{}",
            record.id(),
            escape_name(record.name()),
            record.quantity(),
            record.price(),
            d = DELIMITER
        ),
        EntryFormat::JsonLines => json!({
            "id": record.id(),
            "name": record.name(),
            "quantity": record.quantity(),
            "price": record.price(),
        })
        .to_string(),
    }
}

/// Decodes one line back into a validated record.
pub fn decode(line: &str, format: EntryFormat) -> Result<Record, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    match format {
        EntryFormat::Delimited => decode_delimited(line),
        EntryFormat::JsonLines => decode_json(line),
    }
}

fn decode_delimited(line: &str) -> Result<Record, ParseError> {
    let fields = split_fields(line)?;
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let id = parse_field::<i64>("id", &fields[0])?;
    let quantity = parse_field::<i64>("quantity", &fields[2])?;
    let price = parse_field::<f64>("price", &fields[3])?;

    Ok(Record::new(id, &fields[1], quantity, price)?)
}

#[derive(Deserialize)]
struct JsonEntry {
    id: i64,
    name: String,
    quantity: i64,
    price: f64,
}

fn decode_json(line: &str) -> Result<Record, ParseError> {
    let entry: JsonEntry =
        serde_json::from_str(line).map_err(|e| ParseError::Json(e.to_string()))?;
    Ok(Record::new(entry.id, &entry.name, entry.quantity, entry.price)?)
}

fn parse_field<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ParseError> {
    let raw = raw.trim();
    raw.parse::<T>().map_err(|_| ParseError::NonNumeric {
        field,
        value: raw.to_string(),
    })
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Splits on unescaped delimiters and resolves escapes in every field.
fn split_fields(line: &str) -> Result<Vec<String>, ParseError> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\\') => current.push('\\'),
                Some(DELIMITER) => current.push(DELIMITER),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                _ => return Err(ParseError::BadEscape),
            },
            DELIMITER => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);

    Ok(fields)
}
