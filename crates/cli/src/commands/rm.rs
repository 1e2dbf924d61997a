// `reqbook rm`: delete a saved request by id.

use clap::Args;
use reqbook_common::types::Scope;
use reqbook_core::store::locate_and_remove;
use serde::Serialize;

use super::Context;
use crate::exit_code::{CliError, NOT_FOUND};
use crate::output;

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Request id.
    pub id: String,

    /// Only look in this scope. Without it, global is searched before project.
    #[arg(long)]
    pub scope: Option<Scope>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RmResult {
    pub id: String,
    pub scope: Scope,
}

pub async fn run(ctx: &Context, args: RmArgs) -> anyhow::Result<()> {
    let removed_from = match args.scope {
        Some(scope) => ctx.store().remove(scope, &args.id).await?.then_some(scope),
        None => locate_and_remove(ctx.store(), &args.id).await?,
    };

    let Some(scope) = removed_from else {
        return Err(CliError::new(NOT_FOUND, format!("request `{}` not found", args.id)).into());
    };
    output::print_output(ctx.format, &RmResult { id: args.id, scope }, format_human)?;
    Ok(())
}

fn format_human(result: &RmResult) -> String {
    format!("Deleted [{}] from {}", result.id, result.scope.label())
}
