//! `chemfunct roots`: top-level classes.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use super::{Context, names_of, naming};
use crate::output::{pretty_section, render_mode};

/// Arguments for `chemfunct roots`.
#[derive(Args, Debug, Default)]
pub struct RootsArgs {
    /// Print node ids instead of labels.
    #[arg(long)]
    pub ids: bool,
}

#[derive(Debug, Serialize)]
struct RootsOutput {
    roots: Vec<String>,
}

/// Execute `chemfunct roots`. Roots keep their table order.
pub fn run_roots(args: &RootsArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_store, index) = ctx.load()?;
    let payload = RootsOutput {
        roots: names_of(&index, &index.roots(), naming(args.ids)),
    };

    render_mode(
        ctx.output,
        &payload,
        |p, w| {
            for root in &p.roots {
                writeln!(w, "{root}")?;
            }
            Ok(())
        },
        render_roots_pretty,
    )
}

fn render_roots_pretty(payload: &RootsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Root classes ({})", payload.roots.len()))?;
    for root in &payload.roots {
        writeln!(w, "  - {root}")?;
    }
    Ok(())
}
