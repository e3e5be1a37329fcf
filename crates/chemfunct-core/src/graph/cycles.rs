//! Cycle detection over the reverse (child → parents) adjacency.
//!
//! # Overview
//!
//! A classification hierarchy must be acyclic: ancestor closure and path
//! enumeration both walk edges until they run out, so a single loop would
//! make them run forever. The index runs this check once at build time and
//! refuses to construct itself if any node can reach itself by following
//! parent edges.
//!
//! # Design
//!
//! - **Three-colour DFS**: every node starts White, turns Gray while it is on
//!   the walk stack, and Black once all of its parents are exhausted. Meeting
//!   a Gray parent is a back edge, i.e. a cycle.
//! - **Iterative**: the walk keeps an explicit frame stack so very deep
//!   hierarchies cannot overflow the thread stack.
//! - **Deterministic**: start nodes are tried in slot order and parents in
//!   adjacency order, so the same input always reports the same cycle.
//! - **O(V+E)**: each node and each parent edge is visited at most once.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

/// DFS colours for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// Currently on the DFS stack (in progress).
    Gray,
    /// Fully processed (all ancestors visited).
    Black,
}

/// Find the first cycle reachable by following `parents` edges.
///
/// `parents[n]` lists the parent slots of node slot `n`. Returns `None` for
/// an acyclic graph. Otherwise returns a closed path of slots
/// `[r, a, b, ..., r]` where each element is a parent of the one before it
/// and `r` is the node whose repeat visit exposed the cycle.
pub fn find_first_cycle(parents: &[Vec<usize>]) -> Option<Vec<usize>> {
    let mut color = vec![Color::White; parents.len()];
    // (node slot, index of the next parent to explore)
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for start in 0..parents.len() {
        if color[start] != Color::White {
            continue;
        }

        color[start] = Color::Gray;
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;

            let Some(&parent) = parents[node].get(next) else {
                color[node] = Color::Black;
                frames.pop();
                continue;
            };
            frame.1 += 1;

            match color[parent] {
                Color::White => {
                    color[parent] = Color::Gray;
                    frames.push((parent, 0));
                }
                Color::Gray => {
                    // Back edge: `parent` is already on the stack.
                    let from = frames
                        .iter()
                        .position(|&(slot, _)| slot == parent)
                        .unwrap_or(0);
                    let mut path: Vec<usize> = frames[from..].iter().map(|&(slot, _)| slot).collect();
                    path.push(parent);
                    return Some(path);
                }
                Color::Black => {}
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
