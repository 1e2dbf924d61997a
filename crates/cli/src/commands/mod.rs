// CLI subcommand dispatch.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use reqbook_core::commands::Commands;
use reqbook_core::config::Config;
use reqbook_core::store::RequestStore;

use crate::host::TerminalHost;
use crate::output::OutputFormat;

pub mod clear;
pub mod ls;
pub mod rm;
pub mod save;
pub mod session;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Project root. Defaults to the nearest ancestor holding a project marker.
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Global state file. Overrides the configured location.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Force JSON output.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show saved requests grouped by scope
    Ls(ls::LsArgs),
    /// Save a request read from a file or stdin
    Save(save::SaveArgs),
    /// Delete a saved request
    Rm(rm::RmArgs),
    /// Delete every request in the global scope
    Clear(clear::ClearArgs),
    /// Bridge an edit session over stdin/stdout
    Session(session::SessionArgs),
}

/// Everything a subcommand needs: output format plus the wired command surface.
pub struct Context {
    pub format: OutputFormat,
    pub commands: Commands,
}

impl Context {
    pub fn build(global: &GlobalArgs, mut config: Config) -> anyhow::Result<Self> {
        if let Some(state) = &global.state {
            config.state_path = Some(state.clone());
        }
        let project_root = match &global.project {
            Some(root) => Some(root.clone()),
            None => {
                let cwd = std::env::current_dir().context("failed to read current directory")?;
                config.discover_project_root(&cwd)
            }
        };

        let format = OutputFormat::detect(global.json);
        let store = RequestStore::from_config(&config, project_root)
            .context("failed to locate the global state file")?;
        let host = Arc::new(TerminalHost::new(format));
        Ok(Self { format, commands: Commands::new(Arc::new(store), host) })
    }

    pub fn store(&self) -> &RequestStore {
        self.commands.store()
    }
}

pub fn run(global: GlobalArgs, cmd: Command, config: Config) -> anyhow::Result<()> {
    let ctx = Context::build(&global, config)?;
    match cmd {
        Command::Ls(args) => block_on(ls::run(&ctx, args)),
        Command::Save(args) => block_on(save::run(&ctx, args)),
        Command::Rm(args) => block_on(rm::run(&ctx, args)),
        Command::Clear(args) => block_on(clear::run(&ctx, args)),
        Command::Session(args) => block_on(session::run(&ctx, args)),
    }
}

fn block_on<F>(future: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(future)
}
