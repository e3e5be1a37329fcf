//! `chemfunct parents`: direct superclasses of one class.

use clap::Args;

use super::Context;
use super::relatives::{Relation, run_relatives};

/// Arguments for `chemfunct parents`.
#[derive(Args, Debug, Default)]
pub struct ParentsArgs {
    /// Class id (with the id prefix) or label.
    pub node: String,

    /// Print node ids instead of labels.
    #[arg(long)]
    pub ids: bool,
}

/// Execute `chemfunct parents`.
pub fn run_parents(args: &ParentsArgs, ctx: &Context) -> anyhow::Result<()> {
    run_relatives(Relation::Parents, &args.node, args.ids, ctx)
}
