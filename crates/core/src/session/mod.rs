// Edit sessions: one per open editing surface.
//
// A session reacts to surface messages by mutating the store, notifying the
// host, and queueing replies. Sessions share nothing but the store; a close
// never rolls back a save whose write already started.

pub mod transport;

use std::sync::Arc;

use reqbook_common::protocol::session::{save_target, CoreMessage, SurfaceMessage};
use reqbook_common::types::{RequestRecord, Scope};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::clear_global;
use crate::host::{Host, Notice};
use crate::store::{locate_and_remove, RequestStore};

pub use transport::serve_stream;

pub const SAVED_MESSAGE: &str = "Request saved.";
pub const NOT_SAVED_MESSAGE: &str = "No project is open; request was not saved.";
pub const DELETED_MESSAGE: &str = "Request deleted.";
pub const NOT_FOUND_MESSAGE: &str = "Request not found; nothing was deleted.";
pub const UNREADABLE_SAVE_MESSAGE: &str = "Could not read the request; nothing was saved.";
pub const UNREADABLE_DELETE_MESSAGE: &str = "Could not read the delete request; nothing was deleted.";

/// Result of handling one surface message.
#[derive(Debug, Default, PartialEq)]
pub struct SessionStep {
    /// Messages to send back to the surface, in order.
    pub replies: Vec<CoreMessage>,
    /// The surface should be torn down.
    pub close: bool,
}

impl SessionStep {
    fn reply(message: CoreMessage) -> Self {
        Self { replies: vec![message], close: false }
    }

    fn close() -> Self {
        Self { replies: Vec::new(), close: true }
    }
}

pub struct EditSession {
    id: Uuid,
    store: Arc<RequestStore>,
    host: Arc<dyn Host>,
    initial: Option<RequestRecord>,
    closed: bool,
}

impl EditSession {
    pub fn new(store: Arc<RequestStore>, host: Arc<dyn Host>, initial: Option<RequestRecord>) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, editing = initial.is_some(), "opened edit session");
        Self { id, store, host, initial, closed: false }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Record the session was opened with, if it is an edit session.
    pub fn initial(&self) -> Option<&RequestRecord> {
        self.initial.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tell the user a mutating message of type `kind` could not be parsed.
    /// Other message kinds have nothing to report and are only logged.
    pub fn reject_unreadable(&self, kind: &str) {
        let message = match kind {
            "saveRequest" => UNREADABLE_SAVE_MESSAGE,
            "deleteRequest" => UNREADABLE_DELETE_MESSAGE,
            _ => return,
        };
        if !self.closed {
            self.host.notify(Notice::error(message));
        }
    }

    /// Handle one surface message. Messages after `closePanel` are ignored.
    pub async fn handle(&mut self, message: SurfaceMessage) -> SessionStep {
        if self.closed {
            debug!(session = %self.id, kind = message.kind(), "ignoring message for closed session");
            return SessionStep::default();
        }

        match message {
            SurfaceMessage::Ready => match &self.initial {
                Some(record) => SessionStep::reply(CoreMessage::LoadRequest { request: record.clone() }),
                None => SessionStep::default(),
            },
            SurfaceMessage::SaveRequest { request } => self.save(request).await,
            SurfaceMessage::DeleteRequest { id } => {
                self.delete(&id).await;
                SessionStep::default()
            }
            SurfaceMessage::GetRequests => {
                let mut requests = self.store.list(Scope::Global).await;
                requests.extend(self.store.list(Scope::Project).await);
                SessionStep::reply(CoreMessage::SavedRequests { requests })
            }
            SurfaceMessage::ClearAllRequests => {
                let _ = clear_global(&self.store, self.host.as_ref()).await;
                SessionStep::default()
            }
            SurfaceMessage::ClosePanel => {
                self.closed = true;
                debug!(session = %self.id, "closing edit session");
                SessionStep::close()
            }
        }
    }

    /// Drive the session from a channel until `closePanel`, end of input, or
    /// the outbound side going away.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<SurfaceMessage>,
        outbound: mpsc::Sender<CoreMessage>,
    ) {
        while let Some(message) = inbound.recv().await {
            let step = self.handle(message).await;
            for reply in step.replies {
                if outbound.send(reply).await.is_err() {
                    debug!(session = %self.id, "surface channel closed");
                    return;
                }
            }
            if step.close {
                return;
            }
        }
    }

    async fn save(&mut self, request: RequestRecord) -> SessionStep {
        let scope = save_target(&request);
        let was_new = request.id.is_none();

        match self.store.upsert(scope, request).await {
            Ok(Some(stored)) => {
                info!(session = %self.id, %scope, id = ?stored.id, "session saved request");
                self.host.notify(Notice::info(SAVED_MESSAGE));
                self.host.refresh_tree();
                // Later saves from this surface must reuse the assigned id.
                if was_new {
                    self.initial = Some(stored.clone());
                    return SessionStep::reply(CoreMessage::RequestSaved { request: stored });
                }
                self.initial = Some(stored);
                SessionStep::default()
            }
            Ok(None) => {
                self.host.notify(Notice::info(NOT_SAVED_MESSAGE));
                SessionStep::default()
            }
            Err(error) => {
                warn!(session = %self.id, %scope, %error, "failed to save request");
                self.host.notify(Notice::error(format!("Failed to save request: {error}")));
                SessionStep::default()
            }
        }
    }

    async fn delete(&mut self, id: &str) {
        if id.is_empty() {
            debug!(session = %self.id, "ignoring delete without id");
            return;
        }

        match locate_and_remove(&self.store, id).await {
            Ok(Some(scope)) => {
                info!(session = %self.id, %scope, id, "session deleted request");
                self.host.notify(Notice::info(DELETED_MESSAGE));
                self.host.refresh_tree();
            }
            Ok(None) => self.host.notify(Notice::info(NOT_FOUND_MESSAGE)),
            Err(error) => {
                warn!(session = %self.id, id, %error, "failed to delete request");
                self.host.notify(Notice::error(format!("Failed to delete request: {error}")));
            }
        }
    }
}
