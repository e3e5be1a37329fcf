//! In-memory adjacency index over the classification hierarchy.
//!
//! # Overview
//!
//! [`HierarchyIndex`] is built once from the full node and edge lists and is
//! immutable afterwards. It answers:
//!
//! - Which nodes are roots (no non-null parent edge)?
//! - What are the direct children / parents of a node?
//! - What is the label of an id, or the id of a label?
//!
//! # Validation
//!
//! Construction fails fast, before any traversal can run, when:
//!
//! - a node id or label appears twice ([`BuildError::DuplicateNode`],
//!   [`BuildError::DuplicateLabel`]);
//! - an edge names a node that is not in the node list
//!   ([`BuildError::DanglingReference`]);
//! - following parent edges can revisit a node ([`BuildError::CycleDetected`]).
//!
//! Traversal code downstream relies on these guarantees and never re-checks.
//!
//! # Ordering
//!
//! Nodes keep their node-list order ("discovery order"); children and parents
//! keep first-seen edge order. Duplicate edges collapse to one.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use super::cycles;
use crate::error::{BuildError, QueryError};
use crate::model::{Edge, Node};
use crate::store::TaxonomyStore;

// ---------------------------------------------------------------------------
// HierarchyIndex
// ---------------------------------------------------------------------------

/// Validated, immutable forward and reverse adjacency over the taxonomy.
///
/// Nodes are stored in slots (their position in the node list); adjacency is
/// kept as slot vectors so lookups are a hash probe plus a slice walk.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    nodes: Vec<Node>,
    /// id → slot
    by_id: HashMap<String, usize>,
    /// label → slot
    by_label: HashMap<String, usize>,
    /// lowercased label → slot, `None` when two labels fold together
    by_folded_label: HashMap<String, Option<usize>>,
    /// slot → child slots (edge order)
    children: Vec<Vec<usize>>,
    /// slot → parent slots (edge order)
    parents: Vec<Vec<usize>>,
    /// root slots in node order
    roots: Vec<usize>,
    edge_count: usize,
}

impl HierarchyIndex {
    /// Build the index from raw edge and node rows.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateNode`] / [`BuildError::DuplicateLabel`]
    /// if the id/label bijection is broken, [`BuildError::DanglingReference`]
    /// for the first edge naming an unknown node, and
    /// [`BuildError::CycleDetected`] if parent edges form a loop.
    pub fn build(edges: &[Edge], nodes: &[Node]) -> Result<Self, BuildError> {
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        let mut by_label: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        let mut by_folded_label: HashMap<String, Option<usize>> =
            HashMap::with_capacity(nodes.len());

        for (slot, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), slot).is_some() {
                return Err(BuildError::DuplicateNode(node.id.clone()));
            }
            if let Some(first) = by_label.insert(node.label.clone(), slot) {
                return Err(BuildError::DuplicateLabel {
                    label: node.label.clone(),
                    first: nodes[first].id.clone(),
                    second: node.id.clone(),
                });
            }
            by_folded_label
                .entry(node.label.to_lowercase())
                .and_modify(|existing| *existing = None)
                .or_insert(Some(slot));
        }

        let lookup = |id: &str, edge: &Edge| -> Result<usize, BuildError> {
            by_id
                .get(id)
                .copied()
                .ok_or_else(|| BuildError::DanglingReference {
                    missing: id.to_string(),
                    parent: edge.parent_id.clone(),
                    child: edge.child_id.clone(),
                })
        };

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());

        for edge in edges {
            let parent = edge
                .parent_id
                .as_deref()
                .map(|id| lookup(id, edge))
                .transpose()?;
            let child = lookup(&edge.child_id, edge)?;

            // Root marker rows carry no adjacency.
            let Some(parent) = parent else { continue };

            if seen.insert((parent, child)) {
                children[parent].push(child);
                parents[child].push(parent);
            }
        }

        if let Some(cycle) = cycles::find_first_cycle(&parents) {
            let path: Vec<String> = cycle.iter().map(|&slot| nodes[slot].id.clone()).collect();
            return Err(BuildError::CycleDetected {
                node: path[0].clone(),
                path,
            });
        }

        let roots: Vec<usize> = (0..nodes.len())
            .filter(|&slot| parents[slot].is_empty())
            .collect();

        debug!(
            nodes = nodes.len(),
            edges = seen.len(),
            roots = roots.len(),
            "hierarchy index built"
        );

        Ok(Self {
            nodes: nodes.to_vec(),
            by_id,
            by_label,
            by_folded_label,
            children,
            parents,
            roots,
            edge_count: seen.len(),
        })
    }

    /// Load nodes and edges from `store` and build the index.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Store`] if either list query fails, or any
    /// validation error from [`HierarchyIndex::build`].
    #[instrument(skip(store))]
    pub fn load<S: TaxonomyStore + ?Sized>(store: &S) -> Result<Self, BuildError> {
        let nodes = store.list_nodes().map_err(BuildError::Store)?;
        let edges = store.list_edges().map_err(BuildError::Store)?;
        Self::build(&edges, &nodes)
    }

    // -----------------------------------------------------------------------
    // Structure queries
    // -----------------------------------------------------------------------

    /// Root node ids, in node-list order.
    pub fn roots(&self) -> Vec<&str> {
        self.roots.iter().map(|&slot| self.id_at(slot)).collect()
    }

    /// Leaf node ids (no children), in node-list order.
    pub fn leaves(&self) -> Vec<&str> {
        (0..self.nodes.len())
            .filter(|&slot| self.children[slot].is_empty())
            .map(|slot| self.id_at(slot))
            .collect()
    }

    /// Direct children of `id` in edge order.
    ///
    /// Returns an empty vec if the node has no children or is not known.
    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.slot(id)
            .map(|slot| self.ids_at(&self.children[slot]))
            .unwrap_or_default()
    }

    /// Direct parents of `id` in edge order.
    ///
    /// Returns an empty vec if the node is a root or is not known.
    pub fn parents_of(&self, id: &str) -> Vec<&str> {
        self.slot(id)
            .map(|slot| self.ids_at(&self.parents[slot]))
            .unwrap_or_default()
    }

    /// Returns `true` if `id` names a node in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns `true` if `id` is a known node with no parents.
    pub fn is_root(&self, id: &str) -> bool {
        self.slot(id).is_some_and(|slot| self.parents[slot].is_empty())
    }

    /// Returns `true` if `id` is a known node with no children.
    pub fn is_leaf(&self, id: &str) -> bool {
        self.slot(id).is_some_and(|slot| self.children[slot].is_empty())
    }

    // -----------------------------------------------------------------------
    // Id / label lookup
    // -----------------------------------------------------------------------

    /// Id of the node labelled exactly `label`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] (label) if no node carries `label`.
    pub fn resolve_id(&self, label: &str) -> Result<&str, QueryError> {
        self.by_label
            .get(label)
            .map(|&slot| self.id_at(slot))
            .ok_or_else(|| QueryError::label(label))
    }

    /// Id of the node labelled `label`, ignoring case when the exact label is
    /// absent and the case-folded label is unambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] (label) if neither lookup succeeds.
    pub fn resolve_id_folded(&self, label: &str) -> Result<&str, QueryError> {
        if let Ok(id) = self.resolve_id(label) {
            return Ok(id);
        }
        match self.by_folded_label.get(&label.to_lowercase()) {
            Some(Some(slot)) => Ok(self.id_at(*slot)),
            _ => Err(QueryError::label(label)),
        }
    }

    /// Label of the node with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] (node) if `id` is not in the index.
    pub fn resolve_label(&self, id: &str) -> Result<&str, QueryError> {
        self.slot(id)
            .map(|slot| self.nodes[slot].label.as_str())
            .ok_or_else(|| QueryError::node(id))
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// The node with id `id`, if present.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// All nodes in node-list order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct parent → child edges (root markers excluded).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn slot(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    fn id_at(&self, slot: usize) -> &str {
        self.nodes[slot].id.as_str()
    }

    fn ids_at(&self, slots: &[usize]) -> Vec<&str> {
        slots.iter().map(|&slot| self.id_at(slot)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotFoundKind;

    fn node(id: &str) -> Node {
        Node::new(id, format!("Label {id}"))
    }

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| node(id)).collect()
    }

    // -----------------------------------------------------------------------
    // build: happy paths
    // -----------------------------------------------------------------------

    #[test]
    fn empty_index() {
        let index = HierarchyIndex::build(&[], &[]).unwrap();
        assert!(index.is_empty());
        assert!(index.roots().is_empty());
        assert_eq!(index.edge_count(), 0);
    }

    #[test]
    fn chain_adjacency() {
        let index = HierarchyIndex::build(
            &[
                Edge::root("func_root"),
                Edge::new("func_root", "func_mid"),
                Edge::new("func_mid", "func_leaf"),
            ],
            &nodes(&["func_root", "func_mid", "func_leaf"]),
        )
        .unwrap();

        assert_eq!(index.roots(), vec!["func_root"]);
        assert_eq!(index.children_of("func_root"), vec!["func_mid"]);
        assert_eq!(index.parents_of("func_leaf"), vec!["func_mid"]);
        assert!(index.children_of("func_leaf").is_empty());
        assert!(index.parents_of("func_root").is_empty());
        assert_eq!(index.leaves(), vec!["func_leaf"]);
        assert_eq!(index.edge_count(), 2);
    }

    #[test]
    fn roots_include_nodes_without_edges() {
        let index = HierarchyIndex::build(
            &[Edge::new("func_a", "func_b")],
            &nodes(&["func_a", "func_b", "func_lonely"]),
        )
        .unwrap();
        assert_eq!(index.roots(), vec!["func_a", "func_lonely"]);
        assert!(index.is_root("func_lonely"));
        assert!(index.is_leaf("func_lonely"));
    }

    #[test]
    fn root_marker_does_not_make_child_of_parent_a_root() {
        // func_b has a null-parent row and a real parent: it is not a root.
        let index = HierarchyIndex::build(
            &[
                Edge::root("func_a"),
                Edge::root("func_b"),
                Edge::new("func_a", "func_b"),
            ],
            &nodes(&["func_a", "func_b"]),
        )
        .unwrap();
        assert_eq!(index.roots(), vec!["func_a"]);
    }

    #[test]
    fn multiple_parents_are_kept() {
        let index = HierarchyIndex::build(
            &[Edge::new("func_p1", "func_x"), Edge::new("func_p2", "func_x")],
            &nodes(&["func_p1", "func_p2", "func_x"]),
        )
        .unwrap();
        assert_eq!(index.parents_of("func_x"), vec!["func_p1", "func_p2"]);
        assert_eq!(index.roots(), vec!["func_p1", "func_p2"]);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let index = HierarchyIndex::build(
            &[Edge::new("func_a", "func_b"), Edge::new("func_a", "func_b")],
            &nodes(&["func_a", "func_b"]),
        )
        .unwrap();
        assert_eq!(index.children_of("func_a"), vec!["func_b"]);
        assert_eq!(index.edge_count(), 1);
    }

    #[test]
    fn children_keep_edge_order() {
        let index = HierarchyIndex::build(
            &[
                Edge::new("func_r", "func_z"),
                Edge::new("func_r", "func_a"),
                Edge::new("func_r", "func_m"),
            ],
            &nodes(&["func_r", "func_a", "func_m", "func_z"]),
        )
        .unwrap();
        assert_eq!(
            index.children_of("func_r"),
            vec!["func_z", "func_a", "func_m"]
        );
    }

    #[test]
    fn unknown_node_has_no_adjacency() {
        let index = HierarchyIndex::build(&[], &nodes(&["func_a"])).unwrap();
        assert!(index.children_of("func_nope").is_empty());
        assert!(index.parents_of("func_nope").is_empty());
        assert!(!index.contains("func_nope"));
        assert!(!index.is_root("func_nope"));
    }

    // -----------------------------------------------------------------------
    // build: validation failures
    // -----------------------------------------------------------------------

    #[test]
    fn dangling_child_is_rejected() {
        let err = HierarchyIndex::build(
            &[Edge::new("func_a", "func_ghost")],
            &nodes(&["func_a"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DanglingReference { ref missing, .. } if missing == "func_ghost"
        ));
    }

    #[test]
    fn dangling_parent_is_rejected() {
        let err = HierarchyIndex::build(
            &[Edge::new("func_ghost", "func_a")],
            &nodes(&["func_a"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DanglingReference { ref missing, .. } if missing == "func_ghost"
        ));
    }

    #[test]
    fn dangling_root_marker_is_rejected() {
        let err = HierarchyIndex::build(&[Edge::root("func_ghost")], &[]).unwrap_err();
        assert!(matches!(err, BuildError::DanglingReference { .. }));
    }

    #[test]
    fn two_node_cycle_is_rejected() {
        let err = HierarchyIndex::build(
            &[Edge::new("func_a", "func_b"), Edge::new("func_b", "func_a")],
            &nodes(&["func_a", "func_b"]),
        )
        .unwrap_err();
        match err {
            BuildError::CycleDetected { node, path } => {
                assert_eq!(node, "func_a");
                assert_eq!(path, vec!["func_a", "func_b", "func_a"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_loop_is_rejected() {
        let err = HierarchyIndex::build(&[Edge::new("func_a", "func_a")], &nodes(&["func_a"]))
            .unwrap_err();
        assert!(matches!(err, BuildError::CycleDetected { ref node, .. } if node == "func_a"));
    }

    #[test]
    fn cycle_below_root_is_rejected() {
        let err = HierarchyIndex::build(
            &[
                Edge::root("func_r"),
                Edge::new("func_r", "func_a"),
                Edge::new("func_a", "func_b"),
                Edge::new("func_b", "func_c"),
                Edge::new("func_c", "func_a"),
            ],
            &nodes(&["func_r", "func_a", "func_b", "func_c"]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::CycleDetected { .. }));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = HierarchyIndex::build(
            &[],
            &[Node::new("func_a", "One"), Node::new("func_a", "Two")],
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateNode(ref id) if id == "func_a"));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let err = HierarchyIndex::build(
            &[],
            &[Node::new("func_a", "Same"), Node::new("func_b", "Same")],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateLabel { ref first, ref second, .. }
                if first == "func_a" && second == "func_b"
        ));
    }

    // -----------------------------------------------------------------------
    // lookups
    // -----------------------------------------------------------------------

    #[test]
    fn label_lookup_is_symmetric() {
        let index = HierarchyIndex::build(
            &[],
            &[Node::new("func_1", "Solvents"), Node::new("func_2", "Fillers")],
        )
        .unwrap();

        for node in index.nodes() {
            let id = index.resolve_id(&node.label).unwrap();
            assert_eq!(index.resolve_label(id).unwrap(), node.label);
            let label = index.resolve_label(&node.id).unwrap();
            assert_eq!(index.resolve_id(label).unwrap(), node.id);
        }
    }

    #[test]
    fn missing_lookups_report_kind() {
        let index = HierarchyIndex::build(&[], &[Node::new("func_1", "Solvents")]).unwrap();

        let err = index.resolve_id("Nope").unwrap_err();
        assert!(matches!(
            err,
            QueryError::NotFound { kind: NotFoundKind::Label, .. }
        ));

        let err = index.resolve_label("func_9").unwrap_err();
        assert!(matches!(
            err,
            QueryError::NotFound { kind: NotFoundKind::Node, .. }
        ));
    }

    #[test]
    fn folded_label_lookup() {
        let index = HierarchyIndex::build(
            &[],
            &[
                Node::new("func_1", "Solvents"),
                Node::new("func_2", "pH Adjusters"),
                Node::new("func_3", "PH ADJUSTERS"),
            ],
        )
        .unwrap();

        assert_eq!(index.resolve_id_folded("solvents").unwrap(), "func_1");
        // Exact match still wins when folding is ambiguous.
        assert_eq!(index.resolve_id_folded("pH Adjusters").unwrap(), "func_2");
        assert!(index.resolve_id_folded("ph adjusters").is_err());
        assert!(index.resolve_id("solvents").is_err());
    }
}
