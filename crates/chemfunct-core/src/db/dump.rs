//! Verbatim JSON Lines export of every table in the database.
//!
//! One line per row: `{"table": "<name>", "row": {"<column>": <value>, ...}}`.
//! Tables are visited in `sqlite_master` order and rows in storage order.
//!
//! Plain JSON values cannot carry raw bytes, so two cases are tagged:
//!
//! - BLOB: `{"$blob": "<hex>"}`
//! - TEXT that is not valid UTF-8: `{"$text_bytes": "<hex>"}`
//!
//! Every other TEXT value is a JSON string.

use anyhow::{Context, Result};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::io::Write;
use tracing::debug;

/// Rows written per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DumpSummary {
    pub tables: Vec<(String, usize)>,
}

impl DumpSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

#[derive(Debug, Serialize)]
struct DumpRecord<'a> {
    table: &'a str,
    row: Map<String, Value>,
}

/// Write every user table of `conn` to `out` as JSON Lines.
///
/// # Errors
///
/// Returns an error if a query fails or `out` cannot be written.
pub fn dump_tables<W: Write>(conn: &Connection, out: &mut W) -> Result<DumpSummary> {
    let mut summary = DumpSummary::default();

    for table in table_names(conn)? {
        let mut stmt = conn
            .prepare(&format!("SELECT * FROM {}", quote_ident(&table)))
            .with_context(|| format!("prepare dump of {table}"))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

        let mut rows = stmt
            .query([])
            .with_context(|| format!("query {table}"))?;
        let mut count = 0usize;

        while let Some(row) = rows.next().with_context(|| format!("read {table}"))? {
            let mut fields = Map::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                fields.insert(column.clone(), json_value(row.get_ref(i)?));
            }

            let record = DumpRecord {
                table: &table,
                row: fields,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
            count += 1;
        }

        debug!(table = %table, rows = count, "dumped table");
        summary.tables.push((table, count));
    }

    out.flush().context("flush export output")?;
    Ok(summary)
}

fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )
        .context("prepare table listing")?;
    let names = stmt
        .query_map([], |row| row.get(0))
        .context("list tables")?
        .collect::<rusqlite::Result<Vec<String>>>()
        .context("read table names")?;
    Ok(names)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::String(text.to_string()),
            Err(_) => json!({ "$text_bytes": hex::encode(bytes) }),
        },
        ValueRef::Blob(bytes) => json!({ "$blob": hex::encode(bytes) }),
    }
}
