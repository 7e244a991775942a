//! Text rendering for CLI output
//!
//! Records print as a fixed-width table, id sets as a bracketed list.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::record::Record;
use crate::store::RecordRow;

const NAME_WIDTH: usize = 30;

/// Writes rows as a table, or `empty_message` when there are none.
pub fn write_table<W: Write>(out: &mut W, rows: &[RecordRow], empty_message: &str) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "{}", empty_message);
    }

    writeln!(
        out,
        "{:>4}  {:<width$}  {:>5}  {:>10}",
        "ID",
        "NAME",
        "QTY",
        "PRICE",
        width = NAME_WIDTH
    )?;
    writeln!(out, "{}", "-".repeat(4 + 2 + NAME_WIDTH + 2 + 5 + 2 + 10))?;
    for (id, name, quantity, price) in rows {
        writeln!(
            out,
            "{:>4}  {:<width$.width$}  {:>5}  {:>10.2}",
            id,
            name,
            quantity,
            price,
            width = NAME_WIDTH
        )?;
    }
    Ok(())
}

/// Projects borrowed records into rows
pub fn rows_of(records: &[&Record]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|r| (r.id(), r.name().to_string(), r.quantity(), r.price()))
        .collect()
}

/// Writes an id set as `[1, 2, 3]`
pub fn write_ids<W: Write>(out: &mut W, ids: &BTreeSet<i64>) -> io::Result<()> {
    let joined: Vec<String> = ids.iter().map(i64::to_string).collect();
    writeln!(out, "[{}]", joined.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rows: &[RecordRow]) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, rows, "Inventory is empty.").unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render(&[]), "Inventory is empty.\n");
    }

    #[test]
    fn test_table_layout() {
        let output = render(&[(2, "Widget".to_string(), 3, 1.0)]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  ID  NAME"));
        assert_eq!(lines[1].len(), 55);
        assert!(lines[2].starts_with("   2  Widget"));
        assert!(lines[2].ends_with("      1.00"));
    }

    #[test]
    fn test_long_names_truncated() {
        let long = "x".repeat(45);
        let output = render(&[(1, long, 1, 1.0)]);
        let row = output.lines().nth(2).unwrap();
        assert!(row.contains(&"x".repeat(30)));
        assert!(!row.contains(&"x".repeat(31)));
    }

    #[test]
    fn test_write_ids() {
        let mut buf = Vec::new();
        write_ids(&mut buf, &BTreeSet::from([3, 1, 2])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[1, 2, 3]\n");

        let mut buf = Vec::new();
        write_ids(&mut buf, &BTreeSet::new()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]\n");
    }
}
