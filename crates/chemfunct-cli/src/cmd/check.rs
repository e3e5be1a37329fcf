//! `chemfunct check`: build the index and report its shape.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use super::Context;
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `chemfunct check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct CheckReport {
    database: String,
    nodes: usize,
    edges: usize,
    roots: usize,
    leaves: usize,
}

/// Execute `chemfunct check`.
///
/// Any validation failure (cycle, dangling edge, duplicate) is returned as an
/// error, so the process exits non-zero.
pub fn run_check(_args: &CheckArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_store, index) = ctx.load()?;

    let report = CheckReport {
        database: ctx.db_path()?.display().to_string(),
        nodes: index.node_count(),
        edges: index.edge_count(),
        roots: index.roots().len(),
        leaves: index.leaves().len(),
    };

    render_mode(ctx.output, &report, render_check_text, render_check_pretty)
}

fn render_check_text(report: &CheckReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "ok nodes={} edges={} roots={} leaves={}",
        report.nodes, report.edges, report.roots, report.leaves
    )
}

fn render_check_pretty(report: &CheckReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Taxonomy OK")?;
    pretty_kv(w, "Database", &report.database)?;
    pretty_kv(w, "Nodes", report.nodes.to_string())?;
    pretty_kv(w, "Edges", report.edges.to_string())?;
    pretty_kv(w, "Roots", report.roots.to_string())?;
    pretty_kv(w, "Leaves", report.leaves.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CheckReport {
        CheckReport {
            database: "functional_use.db".into(),
            nodes: 5,
            edges: 4,
            roots: 2,
            leaves: 2,
        }
    }

    #[test]
    fn text_is_single_line() {
        let mut buf = Vec::new();
        render_check_text(&report(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "ok nodes=5 edges=4 roots=2 leaves=2\n"
        );
    }

    #[test]
    fn pretty_lists_counts() {
        let mut buf = Vec::new();
        render_check_pretty(&report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Taxonomy OK\n"));
        assert!(text.contains("Nodes:       5"), "{text}");
    }
}
