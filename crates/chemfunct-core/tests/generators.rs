#![allow(dead_code)]

use chemfunct_core::{Edge, MemoryStore, Node};
use proptest::prelude::*;

/// A random acyclic taxonomy: edges only ever point from a lower slot to a
/// higher one, so no cycle can form.
#[derive(Debug, Clone)]
pub struct Dag {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Slots the test entity is directly tagged with, in assignment order.
    pub tagged: Vec<usize>,
}

impl Dag {
    pub fn id(slot: usize) -> String {
        format!("func_{slot}")
    }

    pub fn store(&self) -> MemoryStore {
        self.store_with_tags(&self.tagged)
    }

    pub fn store_with_tags(&self, tagged: &[usize]) -> MemoryStore {
        let mut store = MemoryStore::new().with_entity("DTXSID1", Some("Sample"));
        for node in &self.nodes {
            store = store.with_node(&node.id, &node.label);
        }
        for edge in &self.edges {
            store = match edge.parent_id.as_deref() {
                Some(parent) => store.with_edge(parent, &edge.child_id),
                None => store.with_root(&edge.child_id),
            };
        }
        for &slot in tagged {
            store = store.with_assignment("DTXSID1", &Self::id(slot), Some("wikipedia"));
        }
        store
    }
}

pub fn arb_dag() -> impl Strategy<Value = Dag> {
    (1usize..24).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..n * 2),
            prop::collection::vec(0..n, 0..6),
        )
            .prop_map(|(n, pairs, tagged)| {
                let nodes = (0..n)
                    .map(|slot| Node::new(Dag::id(slot), format!("Class {slot:02}")))
                    .collect();
                let edges = pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| Edge::new(Dag::id(a.min(b)), Dag::id(a.max(b))))
                    .collect();
                Dag {
                    nodes,
                    edges,
                    tagged,
                }
            })
    })
}
