//! CLI argument parsing for `hstr`.
//!
//! Table selection flags are global so every subcommand reads strings the
//! same way: explicit files first, then a project config, then the tables
//! compiled into the binary.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hstr",
    version,
    about = "Resolve, flatten and lint integration string tables",
    after_help = "Examples:\n  hstr resolve config.error.password_error\n  hstr resolve --strings homeassistant/components/fyta/strings.json entity.sensor.light_status.state.no_data\n  hstr flatten --config hstr.json --out translations/en.json\n  hstr check --config hstr.json --json\n  hstr fmt --strings strings.json --check",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where string tables come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Project config (hstr.json) naming common and component tables
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Component strings file to operate on
    #[arg(long, global = true, value_name = "FILE")]
    pub strings: Option<PathBuf>,

    /// Shared strings file used by `common::` references
    #[arg(long, global = true, value_name = "FILE")]
    pub common: Option<PathBuf>,

    /// Component domain (defaults to the strings file's directory or stem)
    #[arg(long, global = true, value_name = "NAME")]
    pub domain: Option<String>,

    /// Reference hops allowed before a chain is reported as cyclic
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Resolve(ResolveArgs),
    Flatten(FlattenArgs),
    Check(CheckArgs),
    Keys(KeysArgs),
    Fmt(FmtArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Print the resolved text of one or more keys")]
pub struct ResolveArgs {
    /// Dotted or `::`-scoped key paths
    #[arg(value_name = "KEY", required = true)]
    pub keys: Vec<String>,

    /// Print the key itself when it cannot be resolved
    #[arg(long)]
    pub fallback: bool,

    /// Resolve the whole table first so any broken entry fails the command
    #[arg(long)]
    pub eager: bool,

    /// Placeholder value (repeatable)
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub args: Vec<String>,

    /// Emit a JSON object of key to value
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Write the fully resolved table")]
pub struct FlattenArgs {
    /// Output path (stdout when omitted)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Emit a flat dotted-key map instead of the nested document
    #[arg(long)]
    pub flat: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Lint every loaded table")]
pub struct CheckArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List key paths of the selected table")]
pub struct KeysArgs {
    /// Only list keys under this top-level namespace
    #[arg(long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Rewrite strings files in canonical form")]
pub struct FmtArgs {
    /// Report files that are not canonical without rewriting them
    #[arg(long)]
    pub check: bool,
}
