#![forbid(unsafe_code)]

mod cmd;
mod output;

use chemfunct_core::ErrorCode;
use chemfunct_core::config::resolve_config;
use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "chemfunct: chemical functional-use taxonomy queries",
    long_about = None
)]
struct Cli {
    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Taxonomy database file (overrides CHEMFUNCT_DB and config files).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Validate the taxonomy",
        long_about = "Build the hierarchy index and report node, edge, root, and leaf counts. \
                      Fails on cycles, dangling edges, and duplicate ids or labels.",
        after_help = "EXAMPLES:\n    chemfunct check\n    chemfunct --db functional_use.db check --json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        about = "List every root-to-leaf path",
        after_help = "EXAMPLES:\n    chemfunct paths\n    chemfunct paths --ids --delimited"
    )]
    Paths(cmd::paths::PathsArgs),

    #[command(about = "List root classes")]
    Roots(cmd::roots::RootsArgs),

    #[command(
        about = "Classes an entity belongs to",
        long_about = "Show every class an entity belongs to, including implied superclasses. \
                      Use --direct for the assigned classes only.",
        after_help = "EXAMPLES:\n    chemfunct classes DTXSID7021360\n    chemfunct classes DTXSID7021360 --direct --source wikipedia\n    chemfunct classes DTXSID7021360 --ids --delimited"
    )]
    Classes(cmd::classes::ClassesArgs),

    #[command(
        about = "Direct parents of a class",
        after_help = "EXAMPLES:\n    chemfunct parents func_12\n    chemfunct parents \"Aromatic Solvents\" --ids"
    )]
    Parents(cmd::parents::ParentsArgs),

    #[command(
        about = "Direct children of a class",
        after_help = "EXAMPLES:\n    chemfunct children Solvents"
    )]
    Children(cmd::children::ChildrenArgs),

    #[command(
        about = "Export database tables as JSON Lines",
        after_help = "EXAMPLES:\n    chemfunct export --output taxonomy.jsonl"
    )]
    Export(cmd::export::ExportArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CHEMFUNCT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "chemfunct=debug,info"
        } else {
            "chemfunct=info,warn"
        })
    });

    let format = env::var("CHEMFUNCT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    let project_root = env::current_dir()?;

    let config = match resolve_config(&project_root, cli.db.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                output,
                &CliError::coded(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            std::process::exit(1);
        }
    };
    debug!(?config, "resolved configuration");

    let ctx = cmd::Context { config, output };

    let command_result = match cli.command {
        Commands::Check(ref args) => cmd::check::run_check(args, &ctx),
        Commands::Paths(ref args) => cmd::paths::run_paths(args, &ctx),
        Commands::Roots(ref args) => cmd::roots::run_roots(args, &ctx),
        Commands::Classes(ref args) => cmd::classes::run_classes(args, &ctx),
        Commands::Parents(ref args) => cmd::parents::run_parents(args, &ctx),
        Commands::Children(ref args) => cmd::children::run_children(args, &ctx),
        Commands::Export(ref args) => cmd::export::run_export(args, &ctx),
    };

    if let Err(err) = command_result {
        render_error(output, &CliError::from(&err))?;
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["chemfunct", "roots", "--json", "--db", "x.db", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["chemfunct", "--format", "text", "check"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["chemfunct", "--json", "paths"]);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["chemfunct", "check"],
            vec!["chemfunct", "paths", "--ids", "--delimited"],
            vec!["chemfunct", "roots", "--ids"],
            vec!["chemfunct", "classes", "DTXSID1", "--direct", "--source", "appril"],
            vec!["chemfunct", "parents", "func_1", "--ids"],
            vec!["chemfunct", "children", "Solvents"],
            vec!["chemfunct", "export", "--output", "out.jsonl"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?}: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn classes_requires_entity() {
        assert!(Cli::try_parse_from(["chemfunct", "classes"]).is_err());
    }
}
