use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod workflow;

use cli::{Command, RootArgs};

/// Log filter variable; logs go to stderr so stdout stays parseable.
const LOG_ENV: &str = "HSTR_LOG";

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();

    match args.command {
        Command::Resolve(cmd) => workflow::run_resolve(&args.source, cmd),
        Command::Flatten(cmd) => workflow::run_flatten(&args.source, cmd),
        Command::Check(cmd) => workflow::run_check(&args.source, cmd),
        Command::Keys(cmd) => workflow::run_keys(&args.source, cmd),
        Command::Fmt(cmd) => workflow::run_fmt(&args.source, cmd),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
