//! `chemfunct classes`: the classes an entity belongs to.
//!
//! By default this is the full ancestor closure of the entity's direct
//! assignments; `--direct` restricts it to the assignments themselves.

use std::io::Write;

use chemfunct_core::ClosureResolver;
use chemfunct_core::format::join_classes;
use clap::Args;
use serde::Serialize;

use super::{Context, naming};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `chemfunct classes`.
#[derive(Args, Debug, Default)]
pub struct ClassesArgs {
    /// Entity identifier (DTXSID).
    pub entity: String,

    /// Only the directly assigned classes, without implied superclasses.
    #[arg(long)]
    pub direct: bool,

    /// Only use assignments from this source (repeatable).
    #[arg(long = "source", value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Print node ids instead of labels.
    #[arg(long)]
    pub ids: bool,

    /// Print classes on one line, separated by "; ".
    #[arg(long)]
    pub delimited: bool,
}

#[derive(Debug, Serialize)]
struct ClassesOutput {
    entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    direct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<String>>,
    classes: Vec<String>,
    #[serde(skip)]
    delimited: bool,
}

/// Execute `chemfunct classes`.
pub fn run_classes(args: &ClassesArgs, ctx: &Context) -> anyhow::Result<()> {
    let (store, index) = ctx.load()?;
    let resolver = ClosureResolver::new(&index, &store).with_id_prefix(ctx.id_prefix());

    let source_refs: Vec<&str> = args.sources.iter().map(String::as_str).collect();
    let sources = (!source_refs.is_empty()).then_some(source_refs.as_slice());
    let naming = naming(args.ids);

    let classes = if args.direct {
        resolver.direct_assignments(&args.entity, sources, naming)?
    } else {
        resolver.ancestor_closure(&args.entity, sources, naming)?
    };

    let payload = ClassesOutput {
        entity: args.entity.clone(),
        name: resolver.entity_label(&args.entity)?,
        direct: args.direct,
        sources: sources.map(|s| s.iter().map(|v| v.to_ascii_lowercase()).collect()),
        classes,
        delimited: args.delimited,
    };

    render_mode(ctx.output, &payload, render_classes_text, render_classes_pretty)
}

fn render_classes_text(payload: &ClassesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.delimited {
        return writeln!(w, "{}", join_classes(&payload.classes));
    }
    for class in &payload.classes {
        writeln!(w, "{class}")?;
    }
    Ok(())
}

fn render_classes_pretty(payload: &ClassesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = match payload.name {
        Some(ref name) => format!("{} ({name})", payload.entity),
        None => payload.entity.clone(),
    };
    pretty_section(w, &heading)?;
    pretty_kv(
        w,
        "Scope",
        if payload.direct {
            "direct assignments"
        } else {
            "with implied superclasses"
        },
    )?;
    if let Some(ref sources) = payload.sources {
        pretty_kv(w, "Sources", sources.join(", "))?;
    }
    if payload.classes.is_empty() {
        return writeln!(w, "No classes.");
    }
    for class in &payload.classes {
        writeln!(w, "  - {class}")?;
    }
    Ok(())
}
