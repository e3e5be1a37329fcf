//! `chemfunct children`: direct subclasses of one class.

use clap::Args;

use super::Context;
use super::relatives::{Relation, run_relatives};

/// Arguments for `chemfunct children`.
#[derive(Args, Debug, Default)]
pub struct ChildrenArgs {
    /// Class id (with the id prefix) or label.
    pub node: String,

    /// Print node ids instead of labels.
    #[arg(long)]
    pub ids: bool,
}

/// Execute `chemfunct children`.
pub fn run_children(args: &ChildrenArgs, ctx: &Context) -> anyhow::Result<()> {
    run_relatives(Relation::Children, &args.node, args.ids, ctx)
}
