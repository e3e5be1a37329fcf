//! Traversal queries over a validated [`HierarchyIndex`].
//!
//! [`ClosureResolver`] pairs an immutable index with a read-only store and
//! answers the questions callers actually ask:
//!
//! - What are all root-to-leaf classification paths?
//! - Which classes is an entity directly tagged with (optionally only those
//!   asserted by some sources)?
//! - Which classes does an entity belong to once implied superclasses are
//!   included (the ancestor closure)?
//! - What are the parents / children of a class given by id or label?
//!
//! # Ordering
//!
//! Paths come out root by root in discovery order, depth-first, children in
//! edge order. Every set-valued answer is de-duplicated and sorted (by id for
//! [`Naming::Ids`], by label for [`Naming::Labels`]) so results never depend
//! on hash iteration or on the order the store returned rows.
//!
//! # Termination
//!
//! Nothing here checks for cycles: the index refuses to build over a cyclic
//! hierarchy, so every upward or downward walk is finite.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use super::index::HierarchyIndex;
use crate::error::QueryError;
use crate::model::{DEFAULT_ID_PREFIX, Naming, NodeRef, Source};
use crate::store::TaxonomyStore;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One maximal root-to-leaf path, as ids and as the parallel labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyPath {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
}

impl HierarchyPath {
    /// The path in the requested naming.
    pub fn names(&self, naming: Naming) -> &[String] {
        match naming {
            Naming::Ids => &self.ids,
            Naming::Labels => &self.labels,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Traversal frame for path enumeration: a node's children and the next one
/// to descend into.
struct Frame<'i> {
    children: Vec<&'i str>,
    next: usize,
}

// ---------------------------------------------------------------------------
// ClosureResolver
// ---------------------------------------------------------------------------

/// Path, assignment, and ancestry queries against one index snapshot.
///
/// Cheap to construct; holds only borrows. Safe to use from many threads at
/// once when `S: Sync`.
#[derive(Debug)]
pub struct ClosureResolver<'a, S: ?Sized> {
    index: &'a HierarchyIndex,
    store: &'a S,
    id_prefix: &'a str,
}

impl<'a, S: TaxonomyStore + ?Sized> ClosureResolver<'a, S> {
    /// Create a resolver using the default `func_` id prefix.
    pub fn new(index: &'a HierarchyIndex, store: &'a S) -> Self {
        Self {
            index,
            store,
            id_prefix: DEFAULT_ID_PREFIX,
        }
    }

    /// Override the prefix that marks node ids (as opposed to labels).
    #[must_use]
    pub fn with_id_prefix(mut self, id_prefix: &'a str) -> Self {
        self.id_prefix = id_prefix;
        self
    }

    // -----------------------------------------------------------------------
    // Path enumeration
    // -----------------------------------------------------------------------

    /// Every maximal path from a root to a leaf.
    ///
    /// A node with several parents shows up once per path through it. A root
    /// without children is itself a one-node path.
    pub fn all_root_to_leaf_paths(&self) -> Vec<HierarchyPath> {
        let mut paths = Vec::new();

        for root in self.index.roots() {
            let mut path: Vec<&str> = vec![root];
            let mut stack = vec![Frame {
                children: self.index.children_of(root),
                next: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                if frame.children.is_empty() {
                    paths.push(self.path_from(&path));
                    stack.pop();
                    path.pop();
                    continue;
                }

                if let Some(&child) = frame.children.get(frame.next) {
                    frame.next += 1;
                    path.push(child);
                    stack.push(Frame {
                        children: self.index.children_of(child),
                        next: 0,
                    });
                } else {
                    stack.pop();
                    path.pop();
                }
            }
        }

        debug!(paths = paths.len(), "enumerated root-to-leaf paths");
        paths
    }

    // -----------------------------------------------------------------------
    // Entity queries
    // -----------------------------------------------------------------------

    /// The de-duplicated classes `entity_id` is directly tagged with.
    ///
    /// `sources` restricts the result to rows asserted by one of the listed
    /// sources (case-insensitive); `None` uses every row.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSource`] for an unrecognized source
    /// literal, [`QueryError::NotFound`] if the entity is unknown or a row
    /// names a node missing from the index, and [`QueryError::Store`] if the
    /// store query fails.
    pub fn direct_assignments(
        &self,
        entity_id: &str,
        sources: Option<&[&str]>,
        naming: Naming,
    ) -> Result<Vec<String>, QueryError> {
        let direct = self.direct_ids(entity_id, sources)?;
        Ok(self.render(direct, naming))
    }

    /// Every class `entity_id` belongs to: its direct classes plus every
    /// ancestor reachable through any chain of parents.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ClosureResolver::direct_assignments`].
    pub fn ancestor_closure(
        &self,
        entity_id: &str,
        sources: Option<&[&str]>,
        naming: Naming,
    ) -> Result<Vec<String>, QueryError> {
        let direct = self.direct_ids(entity_id, sources)?;

        let mut closure: HashSet<&'a str> = HashSet::with_capacity(direct.len() * 4);
        let mut queue: VecDeque<&'a str> = direct.into_iter().collect();

        while let Some(current) = queue.pop_front() {
            if !closure.insert(current) {
                continue;
            }
            for parent in self.index.parents_of(current) {
                if !closure.contains(parent) {
                    queue.push_back(parent);
                }
            }
        }

        debug!(entity_id, classes = closure.len(), "resolved ancestor closure");
        Ok(self.render(closure, naming))
    }

    /// Display name of an entity, if the store has one.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the store query fails.
    pub fn entity_label(&self, entity_id: &str) -> Result<Option<String>, QueryError> {
        self.store
            .resolve_entity_label(entity_id)
            .map_err(QueryError::Store)
    }

    // -----------------------------------------------------------------------
    // Node queries
    // -----------------------------------------------------------------------

    /// Direct parents of `node` (an id or a label), sorted.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] if `node` matches no id or label.
    pub fn parents_of(&self, node: &str, naming: Naming) -> Result<Vec<String>, QueryError> {
        let id = self.resolve_node(node)?;
        Ok(self.render(self.index.parents_of(id), naming))
    }

    /// Direct children of `node` (an id or a label), sorted.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] if `node` matches no id or label.
    pub fn children_of(&self, node: &str, naming: Naming) -> Result<Vec<String>, QueryError> {
        let id = self.resolve_node(node)?;
        Ok(self.render(self.index.children_of(id), naming))
    }

    /// Resolve a caller's node reference to an id in the index.
    ///
    /// Inputs carrying the id prefix are ids; anything else is a label,
    /// matched exactly first and then case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] (node or label) if nothing matches.
    pub fn resolve_node(&self, node: &str) -> Result<&'a str, QueryError> {
        match NodeRef::parse(node, self.id_prefix) {
            NodeRef::Id(id) => self.indexed_id(id),
            NodeRef::Label(label) => self.index.resolve_id_folded(label),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Validated, de-duplicated direct node ids for an entity.
    fn direct_ids(
        &self,
        entity_id: &str,
        sources: Option<&[&str]>,
    ) -> Result<BTreeSet<&'a str>, QueryError> {
        // Validate the filter before touching the store.
        let allowed = sources.map(Source::parse_list).transpose()?;

        let rows = self
            .store
            .list_assignments(entity_id)
            .map_err(QueryError::Store)?
            .ok_or_else(|| QueryError::entity(entity_id))?;

        let mut direct = BTreeSet::new();
        for row in rows
            .iter()
            .filter(|row| allowed.as_deref().is_none_or(|allowed| row.matches_any(allowed)))
        {
            direct.insert(self.indexed_id(&row.node_id)?);
        }

        Ok(direct)
    }

    /// The index-owned copy of `id`.
    fn indexed_id(&self, id: &str) -> Result<&'a str, QueryError> {
        self.index
            .node(id)
            .map(|node| node.id.as_str())
            .ok_or_else(|| QueryError::node(id))
    }

    /// Sort and name a set of index ids.
    fn render<I>(&self, ids: I, naming: Naming) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out: Vec<String> = match naming {
            Naming::Ids => ids.into_iter().map(str::to_string).collect(),
            Naming::Labels => ids
                .into_iter()
                .filter_map(|id| self.index.resolve_label(id).ok())
                .map(str::to_string)
                .collect(),
        };
        out.sort_unstable();
        out.dedup();
        out
    }

    fn path_from(&self, ids: &[&str]) -> HierarchyPath {
        HierarchyPath {
            ids: ids.iter().map(|id| (*id).to_string()).collect(),
            labels: ids
                .iter()
                .map(|id| self.index.resolve_label(id).unwrap_or(*id).to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
