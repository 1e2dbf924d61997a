// `reqbook session`: bridge one edit session over stdin/stdout.
//
// Each line on stdin is a surface message, each line on stdout a core reply.
// Ends on `closePanel` or end of input.

use anyhow::Context as _;
use clap::Args;
use reqbook_core::session::transport::serve_stream;
use reqbook_core::store::locate;
use tracing::info;

use super::Context;
use crate::exit_code::{CliError, NOT_FOUND};

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Edit an existing request. Omit to start a blank one.
    #[arg(long)]
    pub id: Option<String>,
}

pub async fn run(ctx: &Context, args: SessionArgs) -> anyhow::Result<()> {
    let initial = match &args.id {
        Some(id) => Some(
            locate(ctx.store(), id)
                .await
                .ok_or_else(|| CliError::new(NOT_FOUND, format!("request `{id}` not found")))?,
        ),
        None => None,
    };

    let session = ctx.commands.open_session(initial);
    info!(session = %session.id(), editing = args.id.as_deref().unwrap_or("new"), "session opened");
    serve_stream(tokio::io::stdin(), tokio::io::stdout(), session)
        .await
        .context("edit session failed")
}
