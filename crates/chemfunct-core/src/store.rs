//! Read-only store capability consumed by the engine.
//!
//! The engine never talks to a database directly. Anything that can list the
//! taxonomy's nodes and edges and look up an entity's direct assignments can
//! back an index; see [`crate::db::SqliteStore`] for the SQLite adapter and
//! [`MemoryStore`] for the in-memory one used by tests and embedding callers.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use anyhow::Result;
use std::collections::HashMap;

use crate::model::{Assignment, Edge, Node};

/// The four read operations the engine relies on.
pub trait TaxonomyStore {
    /// Every hierarchy edge row, including `parent_id = NULL` root markers.
    fn list_edges(&self) -> Result<Vec<Edge>>;

    /// Every classification node.
    fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Direct assignment rows for `entity_id`.
    ///
    /// Returns `Ok(None)` when the entity is unknown to the store, and
    /// `Ok(Some(vec![]))` for a known entity with no assignments.
    fn list_assignments(&self, entity_id: &str) -> Result<Option<Vec<Assignment>>>;

    /// Display name of an entity, for presentation only.
    fn resolve_entity_label(&self, entity_id: &str) -> Result<Option<String>>;
}

impl<T: TaxonomyStore + ?Sized> TaxonomyStore for &T {
    fn list_edges(&self) -> Result<Vec<Edge>> {
        (**self).list_edges()
    }

    fn list_nodes(&self) -> Result<Vec<Node>> {
        (**self).list_nodes()
    }

    fn list_assignments(&self, entity_id: &str) -> Result<Option<Vec<Assignment>>> {
        (**self).list_assignments(entity_id)
    }

    fn resolve_entity_label(&self, entity_id: &str) -> Result<Option<String>> {
        (**self).resolve_entity_label(entity_id)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A [`TaxonomyStore`] held entirely in memory.
///
/// Rows are returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    entities: HashMap<String, Option<String>>,
    assignments: HashMap<String, Vec<Assignment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classification node.
    #[must_use]
    pub fn with_node(mut self, id: &str, label: &str) -> Self {
        self.nodes.push(Node::new(id, label));
        self
    }

    /// Add a `parent → child` edge.
    #[must_use]
    pub fn with_edge(mut self, parent_id: &str, child_id: &str) -> Self {
        self.edges.push(Edge::new(parent_id, child_id));
        self
    }

    /// Add a `NULL → child` root marker row.
    #[must_use]
    pub fn with_root(mut self, child_id: &str) -> Self {
        self.edges.push(Edge::root(child_id));
        self
    }

    /// Register an entity, optionally with a display name.
    #[must_use]
    pub fn with_entity(mut self, entity_id: &str, name: Option<&str>) -> Self {
        self.entities
            .insert(entity_id.to_string(), name.map(str::to_string));
        self
    }

    /// Tag `entity_id` with `node_id`. Registers the entity if needed.
    #[must_use]
    pub fn with_assignment(mut self, entity_id: &str, node_id: &str, source: Option<&str>) -> Self {
        self.entities.entry(entity_id.to_string()).or_insert(None);
        self.assignments
            .entry(entity_id.to_string())
            .or_default()
            .push(Assignment::new(node_id, source));
        self
    }
}

impl TaxonomyStore for MemoryStore {
    fn list_edges(&self) -> Result<Vec<Edge>> {
        Ok(self.edges.clone())
    }

    fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.nodes.clone())
    }

    fn list_assignments(&self, entity_id: &str) -> Result<Option<Vec<Assignment>>> {
        if !self.entities.contains_key(entity_id) {
            return Ok(None);
        }
        Ok(Some(
            self.assignments.get(entity_id).cloned().unwrap_or_default(),
        ))
    }

    fn resolve_entity_label(&self, entity_id: &str) -> Result<Option<String>> {
        Ok(self.entities.get(entity_id).cloned().flatten())
    }
}
