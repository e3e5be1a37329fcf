//! Shared body of `parents` and `children`.

use std::io::Write;

use chemfunct_core::ClosureResolver;
use serde::Serialize;

use super::{Context, naming};
use crate::output::{pretty_section, render_mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Parents,
    Children,
}

impl Relation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Parents => "parents",
            Self::Children => "children",
        }
    }
}

#[derive(Debug, Serialize)]
struct RelativesOutput {
    node: String,
    id: String,
    label: String,
    relation: Relation,
    nodes: Vec<String>,
}

pub fn run_relatives(
    relation: Relation,
    node: &str,
    ids: bool,
    ctx: &Context,
) -> anyhow::Result<()> {
    let (store, index) = ctx.load()?;
    let resolver = ClosureResolver::new(&index, &store).with_id_prefix(ctx.id_prefix());

    let naming = naming(ids);
    let nodes = match relation {
        Relation::Parents => resolver.parents_of(node, naming)?,
        Relation::Children => resolver.children_of(node, naming)?,
    };
    let id = resolver.resolve_node(node)?;

    let payload = RelativesOutput {
        node: node.to_string(),
        id: id.to_string(),
        label: index.resolve_label(id)?.to_string(),
        relation,
        nodes,
    };

    render_mode(
        ctx.output,
        &payload,
        |p, w| {
            for n in &p.nodes {
                writeln!(w, "{n}")?;
            }
            Ok(())
        },
        render_relatives_pretty,
    )
}

fn render_relatives_pretty(payload: &RelativesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "{} of {} ({})",
            payload.relation.as_str(),
            payload.label,
            payload.id
        ),
    )?;
    if payload.nodes.is_empty() {
        let none = match payload.relation {
            Relation::Parents => "None (root class).",
            Relation::Children => "None (leaf class).",
        };
        return writeln!(w, "{none}");
    }
    for n in &payload.nodes {
        writeln!(w, "  - {n}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_names_root_and_leaf() {
        let payload = RelativesOutput {
            node: "solvents".into(),
            id: "func_2".into(),
            label: "Solvents".into(),
            relation: Relation::Children,
            nodes: vec![],
        };
        let mut buf = Vec::new();
        render_relatives_pretty(&payload, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("children of Solvents (func_2)\n"), "{text}");
        assert!(text.ends_with("None (leaf class).\n"));
    }

    #[test]
    fn relation_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Relation::Parents).unwrap(),
            serde_json::json!("parents")
        );
    }
}
