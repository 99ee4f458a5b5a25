mod check;

use anyhow::Result;
use clap::Subcommand;

use crate::args::Args;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &Args) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum IslsCommand {
    /// Validate an ISML file against its tokenizer events
    Check(self::check::Check),
}

impl Command for IslsCommand {
    fn execute(&self, args: &Args) -> Result<Exit> {
        match self {
            IslsCommand::Check(check) => check.execute(args),
        }
    }
}
