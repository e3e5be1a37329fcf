//! Row types shared by the index, the resolver, and the store adapters.
//!
//! # Conventions
//!
//! - Node ids carry a fixed prefix ([`DEFAULT_ID_PREFIX`]); anything else a
//!   caller passes where a node is expected is treated as a label.
//! - Sources are a closed set ([`Source`]); parsing is case-insensitive.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Prefix that distinguishes classification ids from labels.
pub const DEFAULT_ID_PREFIX: &str = "func_";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A classification category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A directed hierarchy relation. `parent_id == None` marks a root row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub parent_id: Option<String>,
    pub child_id: String,
}

impl Edge {
    /// Parent → child edge.
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            child_id: child_id.into(),
        }
    }

    /// Root marker row for `child_id`.
    pub fn root(child_id: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            child_id: child_id.into(),
        }
    }
}

/// A direct tag of an entity with a node, optionally attributed to a source.
///
/// `source` is kept as the raw stored string; it is only interpreted as a
/// [`Source`] when a caller filters by source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub node_id: String,
    pub source: Option<String>,
}

impl Assignment {
    pub fn new(node_id: impl Into<String>, source: Option<&str>) -> Self {
        Self {
            node_id: node_id.into(),
            source: source.map(str::to_string),
        }
    }

    /// Returns `true` if this row's source is one of `allowed`.
    ///
    /// Unattributed rows and rows with an unrecognized stored source never
    /// match a filter.
    pub fn matches_any(&self, allowed: &[Source]) -> bool {
        self.source
            .as_deref()
            .and_then(|raw| raw.parse::<Source>().ok())
            .is_some_and(|source| allowed.contains(&source))
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Provenance of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Wikipedia,
    Appril,
    Drugbank,
    Chemexpo,
}

impl Source {
    pub const ALL: [Self; 4] = [Self::Wikipedia, Self::Appril, Self::Drugbank, Self::Chemexpo];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::Appril => "appril",
            Self::Drugbank => "drugbank",
            Self::Chemexpo => "chemexpo",
        }
    }

    /// Parse a caller-supplied allow-list, failing on the first unknown value.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSource`] naming the offending literal.
    pub fn parse_list<I, S>(raw: I) -> Result<Vec<Self>, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(|s| s.as_ref().parse()).collect()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wikipedia" => Ok(Self::Wikipedia),
            "appril" => Ok(Self::Appril),
            "drugbank" => Ok(Self::Drugbank),
            "chemexpo" => Ok(Self::Chemexpo),
            _ => Err(QueryError::InvalidSource(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Query selectors
// ---------------------------------------------------------------------------

/// Whether a query should answer with node ids or node labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    Ids,
    #[default]
    Labels,
}

/// A caller's reference to a node: either an id or a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Id(&'a str),
    Label(&'a str),
}

impl<'a> NodeRef<'a> {
    /// Classify `input` using the id-prefix convention.
    pub fn parse(input: &'a str, id_prefix: &str) -> Self {
        if input.starts_with(id_prefix) {
            Self::Id(input)
        } else {
            Self::Label(input)
        }
    }
}
