//! [`TaxonomyStore`] over the SQLite taxonomy database.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::instrument;

use crate::model::{Assignment, Edge, Node};
use crate::store::TaxonomyStore;

/// Read-only adapter over one SQLite connection.
///
/// Rows come back in rowid order so discovery order matches insertion order.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        super::open(path).map(Self::from_connection)
    }

    /// Wrap an existing connection (tests, in-memory fixtures).
    pub const fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    fn entity_exists(&self, entity_id: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM Chemicals WHERE dtxsid = ?1 LIMIT 1",
                params![entity_id],
                |row| row.get(0),
            )
            .optional()
            .context("look up entity")?;
        Ok(found.is_some())
    }
}

impl TaxonomyStore for SqliteStore {
    #[instrument(skip(self))]
    fn list_edges(&self) -> Result<Vec<Edge>> {
        let mut stmt = self
            .conn
            .prepare("SELECT parent_id, child_id FROM ClassificationHierarchy ORDER BY rowid")
            .context("prepare edge query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Edge {
                    parent_id: row.get(0)?,
                    child_id: row.get(1)?,
                })
            })
            .context("query edges")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("read edge rows")
    }

    #[instrument(skip(self))]
    fn list_nodes(&self) -> Result<Vec<Node>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, classification FROM Classifications ORDER BY rowid")
            .context("prepare node query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Node {
                    id: row.get(0)?,
                    label: row.get(1)?,
                })
            })
            .context("query nodes")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("read node rows")
    }

    fn list_assignments(&self, entity_id: &str) -> Result<Option<Vec<Assignment>>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT classification_id, source_id FROM ChemicalClassifications \
                 WHERE dtxsid = ?1 ORDER BY rowid",
            )
            .context("prepare assignment query")?;

        let rows = stmt
            .query_map(params![entity_id], |row| {
                Ok(Assignment {
                    node_id: row.get(0)?,
                    source: row.get(1)?,
                })
            })
            .with_context(|| format!("query assignments for {entity_id}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("read assignments for {entity_id}"))?;

        if rows.is_empty() && !self.entity_exists(entity_id)? {
            return Ok(None);
        }
        Ok(Some(rows))
    }

    fn resolve_entity_label(&self, entity_id: &str) -> Result<Option<String>> {
        let name: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT name FROM Chemicals WHERE dtxsid = ?1",
                params![entity_id],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("look up name of {entity_id}"))?;
        Ok(name.flatten())
    }
}
