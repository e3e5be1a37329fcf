//! Taxonomy database layout.
//!
//! - `Classifications` holds the nodes (`id` ↔ `classification` label)
//! - `ClassificationHierarchy` holds the edges; `parent_id IS NULL` marks a root
//! - `Chemicals` holds the entities and their display names
//! - `ChemicalClassifications` holds the direct, source-attributed assignments

use rusqlite::Connection;

pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS Classifications (
    id TEXT PRIMARY KEY,
    classification TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS ClassificationHierarchy (
    parent_id TEXT,
    child_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Chemicals (
    dtxsid TEXT PRIMARY KEY,
    name TEXT
);

CREATE TABLE IF NOT EXISTS ChemicalClassifications (
    dtxsid TEXT NOT NULL,
    classification_id TEXT NOT NULL,
    source_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_hierarchy_child ON ClassificationHierarchy(child_id);
CREATE INDEX IF NOT EXISTS idx_chem_class_dtxsid ON ChemicalClassifications(dtxsid);
";

/// Create the taxonomy tables on a writable connection.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
