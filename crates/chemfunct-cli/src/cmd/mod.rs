//! Subcommand handlers. Each module owns its clap args and its renderers.

pub mod check;
pub mod children;
pub mod classes;
pub mod export;
pub mod parents;
pub mod paths;
mod relatives;
pub mod roots;

use std::path::Path;

use anyhow::{Context as _, Result};
use chemfunct_core::config::EffectiveConfig;
use chemfunct_core::db::SqliteStore;
use chemfunct_core::{DatabaseNotFound, HierarchyIndex, Naming};
use tracing::debug;

use crate::output::OutputMode;

/// Everything a handler needs besides its own args.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: EffectiveConfig,
    pub output: OutputMode,
}

impl Context {
    /// The configured database path.
    pub fn db_path(&self) -> Result<&Path> {
        self.config
            .db_path
            .as_deref()
            .ok_or_else(|| DatabaseNotFound { path: None }.into())
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(self.db_path()?)
    }

    /// Open the store and build a validated index over it.
    pub fn load(&self) -> Result<(SqliteStore, HierarchyIndex)> {
        let store = self.open_store()?;
        let index = HierarchyIndex::load(&store).context("build taxonomy index")?;
        debug!(
            nodes = index.node_count(),
            edges = index.edge_count(),
            "taxonomy index ready"
        );
        Ok((store, index))
    }

    pub fn id_prefix(&self) -> &str {
        &self.config.id_prefix
    }
}

/// `--ids` flag to naming selector.
pub const fn naming(ids: bool) -> Naming {
    if ids { Naming::Ids } else { Naming::Labels }
}

/// Display names for a list of index ids, in the given naming.
pub fn names_of(index: &HierarchyIndex, ids: &[&str], naming: Naming) -> Vec<String> {
    ids.iter()
        .map(|id| match naming {
            Naming::Ids => (*id).to_string(),
            Naming::Labels => index.resolve_label(id).unwrap_or(*id).to_string(),
        })
        .collect()
}
