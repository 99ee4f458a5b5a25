use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::args::GlobalArgs;
use crate::commands::Command;
use crate::commands::IslsCommand;
use crate::exit::Exit;

/// ISML tag-grammar linter
#[derive(Parser)]
#[command(name = "isls")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: IslsCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub fn run(args: Vec<String>) -> Result<Exit> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    init_logging(&cli.args.global);
    cli.command.execute(&cli.args)
}

fn init_logging(global: &GlobalArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(global.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
