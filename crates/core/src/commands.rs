// Host command surface: open a create-or-edit session, clear all requests.

use std::sync::Arc;

use reqbook_common::display::{DisplayHierarchy, NodeCommand, CLEAR_ALL_COMMAND, OPEN_REQUEST_COMMAND};
use reqbook_common::types::{RequestRecord, Scope};
use thiserror::Error;
use tracing::warn;

use crate::host::{Host, Notice};
use crate::projector;
use crate::session::EditSession;
use crate::store::{RequestStore, StoreError};

pub const CLEARED_MESSAGE: &str = "All saved requests cleared.";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What running a command produced.
pub enum CommandOutcome {
    /// A new editing session the host should attach a surface to.
    Session(EditSession),
    Done,
}

#[derive(Clone)]
pub struct Commands {
    store: Arc<RequestStore>,
    host: Arc<dyn Host>,
}

impl Commands {
    pub fn new(store: Arc<RequestStore>, host: Arc<dyn Host>) -> Self {
        Self { store, host }
    }

    pub fn store(&self) -> &Arc<RequestStore> {
        &self.store
    }

    /// Start an independent session, editing `record` or creating a new one.
    pub fn open_session(&self, record: Option<RequestRecord>) -> EditSession {
        EditSession::new(self.store.clone(), self.host.clone(), record)
    }

    /// Clear the global scope, notify, and refresh the tree.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        clear_global(&self.store, self.host.as_ref()).await
    }

    /// Current display hierarchy, rebuilt from both scopes.
    pub async fn tree(&self) -> DisplayHierarchy {
        projector::project(&self.store).await
    }

    /// Run a node's command, as the host does when a tree node is activated.
    pub async fn execute(&self, command: &NodeCommand) -> Result<CommandOutcome, CommandError> {
        match command.command.as_str() {
            OPEN_REQUEST_COMMAND => Ok(CommandOutcome::Session(self.open_session(command.record.clone()))),
            CLEAR_ALL_COMMAND => {
                self.clear_all().await?;
                Ok(CommandOutcome::Done)
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub(crate) async fn clear_global(store: &RequestStore, host: &dyn Host) -> Result<(), StoreError> {
    match store.clear(Scope::Global).await {
        Ok(()) => {
            host.notify(Notice::info(CLEARED_MESSAGE));
            host.refresh_tree();
            Ok(())
        }
        Err(error) => {
            warn!(%error, "failed to clear global requests");
            host.notify(Notice::error(format!("Failed to clear saved requests: {error}")));
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::store::{GlobalState, ScopeResolver};
    use tempfile::{tempdir, TempDir};

    fn commands() -> (Commands, Arc<MemoryHost>, TempDir) {
        let tmp = tempdir().expect("tempdir should be created");
        let state = GlobalState::new(tmp.path().join("state.json"));
        let store = RequestStore::new(state, ScopeResolver::new(None, "requests.json"));
        let host = Arc::new(MemoryHost::default());
        (Commands::new(Arc::new(store), host.clone()), host, tmp)
    }

    #[tokio::test]
    async fn clear_all_notifies_and_refreshes() {
        let (commands, host, _tmp) = commands();
        commands.store().upsert(Scope::Global, RequestRecord::new("GET", "/")).await.unwrap();

        commands.clear_all().await.unwrap();

        assert!(commands.store().list(Scope::Global).await.is_empty());
        assert_eq!(host.last_notice(), Some(Notice::info(CLEARED_MESSAGE)));
        assert_eq!(host.refresh_count(), 1);
    }

    #[tokio::test]
    async fn activating_a_leaf_opens_an_edit_session() {
        let (commands, _host, _tmp) = commands();
        commands
            .store()
            .upsert(Scope::Global, RequestRecord::new("GET", "/a").with_id("r1"))
            .await
            .unwrap();

        let tree = commands.tree().await;
        let leaf = &tree.sections[0].items[0];
        let outcome = commands.execute(&leaf.command).await.unwrap();
        let CommandOutcome::Session(session) = outcome else {
            panic!("open command should produce a session");
        };
        assert_eq!(session.initial().and_then(|r| r.id()), Some("r1"));
    }

    #[tokio::test]
    async fn create_node_opens_blank_session() {
        let (commands, _host, _tmp) = commands();
        let tree = commands.tree().await;
        let CommandOutcome::Session(session) = commands.execute(&tree.create.command).await.unwrap()
        else {
            panic!("create command should produce a session");
        };
        assert!(session.initial().is_none());
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let (commands, _host, _tmp) = commands();
        let command = NodeCommand { command: "reqbook.send".into(), title: "Send".into(), record: None };
        let error = commands.execute(&command).await.err().expect("should fail");
        assert!(matches!(error, CommandError::Unknown(name) if name == "reqbook.send"));
    }
}
