//! chemfunct-core: functional-use taxonomy hierarchy engine.
//!
//! A [`HierarchyIndex`] is built once from a [`TaxonomyStore`]'s nodes and
//! edges and validated (no dangling references, no cycles). A
//! [`ClosureResolver`] then answers path, assignment, and ancestry queries
//! against that immutable index.
//!
//! # Conventions
//!
//! - **Errors**: typed [`BuildError`] / [`QueryError`] at the engine surface,
//!   `anyhow::Result` in the storage and config layers.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`); no subscriber is
//!   installed here.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod graph;
pub mod model;
pub mod store;

pub use error::{BuildError, DatabaseNotFound, ErrorCode, NotFoundKind, QueryError};
pub use graph::{ClosureResolver, HierarchyIndex, HierarchyPath, SharedIndex};
pub use model::{Assignment, DEFAULT_ID_PREFIX, Edge, Naming, Node, NodeRef, Source};
pub use store::{MemoryStore, TaxonomyStore};
