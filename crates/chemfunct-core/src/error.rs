//! Error taxonomy for index construction and traversal queries.
//!
//! Two families of failure exist:
//!
//! - [`BuildError`]: structural integrity faults in the source data, detected
//!   exactly once while a [`HierarchyIndex`] is built. Fatal to that build
//!   attempt; the caller must fix the data and rebuild.
//! - [`QueryError`]: caller-input faults raised by traversal queries against a
//!   validated index (missing entity/node/label, unrecognized source filter).
//!
//! Every variant maps to a stable [`ErrorCode`] so the CLI and other callers
//! can branch on a machine-readable identifier.
//!
//! [`HierarchyIndex`]: crate::graph::index::HierarchyIndex

use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DatabaseNotFound,
    DanglingReference,
    CycleDetected,
    DuplicateNode,
    DuplicateLabel,
    EntityNotFound,
    NodeNotFound,
    LabelNotFound,
    InvalidSource,
    StoreFailure,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DatabaseNotFound => "E1002",
            Self::DanglingReference => "E2001",
            Self::CycleDetected => "E2002",
            Self::DuplicateNode => "E2003",
            Self::DuplicateLabel => "E2004",
            Self::EntityNotFound => "E3001",
            Self::NodeNotFound => "E3002",
            Self::LabelNotFound => "E3003",
            Self::InvalidSource => "E3004",
            Self::StoreFailure => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DatabaseNotFound => "Taxonomy database not found",
            Self::DanglingReference => "Edge references an unknown node",
            Self::CycleDetected => "Hierarchy contains a cycle",
            Self::DuplicateNode => "Duplicate node id",
            Self::DuplicateLabel => "Duplicate node label",
            Self::EntityNotFound => "Entity not found",
            Self::NodeNotFound => "Node not found",
            Self::LabelNotFound => "Label not found",
            Self::InvalidSource => "Invalid assignment source",
            Self::StoreFailure => "Store query failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in chemfunct.toml and retry."),
            Self::DatabaseNotFound => {
                Some("Pass --db, set CHEMFUNCT_DB, or set [database] path in chemfunct.toml.")
            }
            Self::DanglingReference => {
                Some("Add the missing classification or remove the edge, then rebuild.")
            }
            Self::CycleDetected => Some("Remove one hierarchy edge in the reported cycle."),
            Self::DuplicateNode | Self::DuplicateLabel => {
                Some("Node ids and labels must be unique; deduplicate the classifications table.")
            }
            Self::EntityNotFound | Self::NodeNotFound | Self::LabelNotFound => None,
            Self::InvalidSource => Some("Use one of: wikipedia, appril, drugbank, chemexpo."),
            Self::StoreFailure => Some("Check the database file is readable and not corrupt."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// No usable taxonomy database file.
///
/// `path` is `None` when nothing was configured at all.
#[derive(Debug, thiserror::Error)]
#[error("taxonomy database not found{}", .path.as_ref().map(|p| format!(": {}", p.display())).unwrap_or_default())]
pub struct DatabaseNotFound {
    pub path: Option<PathBuf>,
}

impl DatabaseNotFound {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::DatabaseNotFound
    }
}

/// Structural faults detected while building a hierarchy index.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An edge references a node id that is not in the node list.
    #[error("edge {} -> {child} references unknown node '{missing}'", .parent.as_deref().unwrap_or("<root>"))]
    DanglingReference {
        missing: String,
        parent: Option<String>,
        child: String,
    },

    /// Following parent edges revisited a node before reaching a root.
    ///
    /// `path` is closed: its first and last element are `node`.
    #[error("cycle detected at '{node}': {}", .path.join(" -> "))]
    CycleDetected { node: String, path: Vec<String> },

    /// Two nodes share the same id.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    /// Two nodes share the same label, breaking the id/label bijection.
    #[error("duplicate label '{label}' (ids '{first}' and '{second}')")]
    DuplicateLabel {
        label: String,
        first: String,
        second: String,
    },

    /// Loading nodes or edges from the store failed.
    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),
}

impl BuildError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DanglingReference { .. } => ErrorCode::DanglingReference,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::DuplicateNode(_) => ErrorCode::DuplicateNode,
            Self::DuplicateLabel { .. } => ErrorCode::DuplicateLabel,
            Self::Store(_) => ErrorCode::StoreFailure,
        }
    }
}

/// What kind of thing a [`QueryError::NotFound`] failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotFoundKind {
    Entity,
    Node,
    Label,
}

impl NotFoundKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Node => "node",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Faults raised by traversal queries against a built index.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The requested entity, node, or label does not exist.
    #[error("{kind} not found: '{key}'")]
    NotFound { kind: NotFoundKind, key: String },

    /// A source filter value outside the fixed source set.
    #[error("invalid source '{0}': expected one of wikipedia, appril, drugbank, chemexpo")]
    InvalidSource(String),

    /// Reading assignment rows from the store failed.
    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),
}

impl QueryError {
    pub(crate) fn entity(key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Entity,
            key: key.into(),
        }
    }

    pub(crate) fn node(key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Node,
            key: key.into(),
        }
    }

    pub(crate) fn label(key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Label,
            key: key.into(),
        }
    }

    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { kind, .. } => match kind {
                NotFoundKind::Entity => ErrorCode::EntityNotFound,
                NotFoundKind::Node => ErrorCode::NodeNotFound,
                NotFoundKind::Label => ErrorCode::LabelNotFound,
            },
            Self::InvalidSource(_) => ErrorCode::InvalidSource,
            Self::Store(_) => ErrorCode::StoreFailure,
        }
    }
}
