mod commands;
pub mod exit_codes;
mod output;
mod suggest;

pub use commands::{Cli, Commands, Interaction, RunArgs};

use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    commands::execute(cli)
}
