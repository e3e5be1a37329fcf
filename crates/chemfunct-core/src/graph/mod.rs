//! In-memory hierarchy structures and the traversals built on them.
//!
//! ## Submodules
//!
//! - [`index`]: Validated forward/reverse adjacency with id ↔ label lookup.
//! - [`cycles`]: Cycle detection run once when an index is built.
//! - [`closure`]: Path enumeration, direct assignments, and ancestor closure.
//! - [`shared`]: Rebuildable `Arc` handle for long-lived callers.

pub mod closure;
pub mod cycles;
pub mod index;
pub mod shared;

pub use closure::{ClosureResolver, HierarchyPath};
pub use index::HierarchyIndex;
pub use shared::SharedIndex;
