//! `chemfunct paths`: every root-to-leaf classification path.

use std::io::Write;

use chemfunct_core::format::{join_path, join_paths};
use chemfunct_core::{ClosureResolver, HierarchyPath, Naming};
use clap::Args;
use serde::Serialize;

use super::{Context, naming};
use crate::output::{pretty_section, render_mode};

/// Arguments for `chemfunct paths`.
#[derive(Args, Debug, Default)]
pub struct PathsArgs {
    /// Print node ids instead of labels.
    #[arg(long)]
    pub ids: bool,

    /// Print all paths on one line, separated by " | ".
    #[arg(long)]
    pub delimited: bool,
}

#[derive(Debug, Serialize)]
struct PathsOutput {
    #[serde(skip)]
    naming: Naming,
    #[serde(skip)]
    delimited: bool,
    count: usize,
    paths: Vec<HierarchyPath>,
}

/// Execute `chemfunct paths`.
pub fn run_paths(args: &PathsArgs, ctx: &Context) -> anyhow::Result<()> {
    let (store, index) = ctx.load()?;
    let resolver = ClosureResolver::new(&index, &store).with_id_prefix(ctx.id_prefix());
    let paths = resolver.all_root_to_leaf_paths();

    let payload = PathsOutput {
        naming: naming(args.ids),
        delimited: args.delimited,
        count: paths.len(),
        paths,
    };

    render_mode(ctx.output, &payload, render_paths_text, render_paths_pretty)
}

fn render_paths_text(payload: &PathsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.delimited {
        return writeln!(w, "{}", join_paths(&payload.paths, payload.naming));
    }
    for path in &payload.paths {
        writeln!(w, "{}", join_path(path, payload.naming))?;
    }
    Ok(())
}

fn render_paths_pretty(payload: &PathsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.paths.is_empty() {
        return writeln!(w, "No classification paths (taxonomy is empty).");
    }
    pretty_section(w, &format!("Classification paths ({})", payload.count))?;
    render_paths_text(payload, w)
}
