//! `chemfunct export`: dump every database table as JSON Lines.
//!
//! With `--output`, rows go to a temp file beside the target, which replaces
//! the target only once the whole dump succeeded.

use anyhow::{Context as _, Result};
use chemfunct_core::db::{SqliteStore, dump};
use clap::Args;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use super::Context;

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Output JSONL path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run_export(args: &ExportArgs, ctx: &Context) -> Result<()> {
    let store = SqliteStore::open(ctx.db_path()?)?;
    let conn = store.connection();

    let summary = match args.output.as_deref() {
        Some(path) => write_atomically(path, |out| dump::dump_tables(conn, out)),
        None => dump::dump_tables(conn, &mut BufWriter::new(io::stdout())),
    }
    .context("failed to export tables")?;

    info!(
        tables = summary.tables.len(),
        rows = summary.total_rows(),
        "export complete"
    );
    Ok(())
}

/// Run `write` against a temp file in `path`'s directory and move it over
/// `path` on success. On failure `path` is left untouched.
fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create output file in {}", dir.display()))?;

    let value = {
        let mut out = BufWriter::new(&mut tmp);
        let value = write(&mut out)?;
        out.flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
        value
    };

    tmp.persist(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    Ok(value)
}
