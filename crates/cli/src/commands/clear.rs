// `reqbook clear`: drop every request in the global scope.

use clap::Args;

use super::Context;

#[derive(Debug, Args)]
pub struct ClearArgs {}

/// The confirmation notice is printed by the host.
pub async fn run(ctx: &Context, _args: ClearArgs) -> anyhow::Result<()> {
    ctx.commands.clear_all().await?;
    Ok(())
}
