//! Command dispatch.

pub mod files;
pub mod normalize;
pub mod run;
pub mod schema;

use crate::cli::{Cli, Command};
use anyhow::Result;

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => run::handle(args).await,
        Command::Files(args) => files::handle(args),
        Command::Normalize { path } => normalize::handle(&path),
        Command::Schema { schema_style } => schema::handle(schema_style.into()),
    }
}
