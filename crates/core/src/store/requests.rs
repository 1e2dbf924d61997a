// Request store: CRUD over one scope's collection.
//
// Every operation re-reads the durable collection and mutating operations
// write it back whole. The per-scope lock only orders read-modify-write
// cycles inside this process; other processes are last-writer-wins.

use std::path::PathBuf;

use reqbook_common::codec::{self, Collection};
use reqbook_common::types::{RequestRecord, Scope};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::scope::{Location, ScopeResolver};
use super::state::GlobalState;
use super::{read_optional, write_atomic, StoreError};
use crate::config::{Config, ConfigError};

pub struct RequestStore {
    state: GlobalState,
    resolver: ScopeResolver,
    global_lock: Mutex<()>,
    project_lock: Mutex<()>,
}

impl RequestStore {
    pub fn new(state: GlobalState, resolver: ScopeResolver) -> Self {
        Self { state, resolver, global_lock: Mutex::new(()), project_lock: Mutex::new(()) }
    }

    pub fn from_config(config: &Config, project_root: Option<PathBuf>) -> Result<Self, ConfigError> {
        let state = GlobalState::new(config.state_path()?);
        Ok(Self::new(state, ScopeResolver::from_config(config, project_root)))
    }

    pub fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }

    pub fn global_state(&self) -> &GlobalState {
        &self.state
    }

    /// Records of `scope` in stored order, each tagged with `scope`.
    /// Never fails: unavailable or unreadable storage lists as empty.
    pub async fn list(&self, scope: Scope) -> Vec<RequestRecord> {
        let location = self.resolver.resolve(scope);
        match self.read(&location).await {
            Ok(collection) => tag(collection, scope),
            Err(error) => {
                warn!(%scope, %error, "failed to read request store; listing as empty");
                Vec::new()
            }
        }
    }

    /// Record `id` in `scope`, if present.
    pub async fn get(&self, scope: Scope, id: &str) -> Option<RequestRecord> {
        self.list(scope).await.into_iter().find(|record| record.id() == Some(id))
    }

    /// Insert or replace `record` in `scope`, assigning an id when it has none.
    ///
    /// Returns the stored record tagged with `scope`, or `None` when the scope
    /// is unavailable and nothing was saved. A matching id is replaced whole;
    /// there is no field-level merge.
    pub async fn upsert(
        &self,
        scope: Scope,
        mut record: RequestRecord,
    ) -> Result<Option<RequestRecord>, StoreError> {
        let location = self.resolver.resolve(scope);
        if !location.is_available() {
            debug!(%scope, "scope unavailable; request not saved");
            return Ok(None);
        }

        let id = record.id.get_or_insert_with(new_request_id).clone();
        record.scope = Some(scope);

        let _guard = self.lock(scope).await;
        let mut collection = self.read(&location).await?;
        let replaced = match collection.iter().position(|existing| existing.id() == Some(&id)) {
            Some(index) => {
                collection[index] = record.clone();
                true
            }
            None => {
                collection.push(record.clone());
                false
            }
        };
        self.write(&location, &collection).await?;

        info!(%scope, id = %id, replaced, "saved request");
        Ok(Some(record))
    }

    /// Remove every record with `id` from `scope`. Writes only when
    /// something was removed.
    pub async fn remove(&self, scope: Scope, id: &str) -> Result<bool, StoreError> {
        let location = self.resolver.resolve(scope);
        if !location.is_available() {
            return Ok(false);
        }

        let _guard = self.lock(scope).await;
        let mut collection = self.read(&location).await?;
        let before = collection.len();
        collection.retain(|record| record.id() != Some(id));
        if collection.len() == before {
            debug!(%scope, id, "no request to remove");
            return Ok(false);
        }
        self.write(&location, &collection).await?;

        info!(%scope, id, "removed request");
        Ok(true)
    }

    /// Replace `scope`'s collection with an empty one.
    pub async fn clear(&self, scope: Scope) -> Result<(), StoreError> {
        let location = self.resolver.resolve(scope);
        if !location.is_available() {
            return Ok(());
        }

        let _guard = self.lock(scope).await;
        self.write(&location, &[]).await?;
        info!(%scope, "cleared requests");
        Ok(())
    }

    async fn lock(&self, scope: Scope) -> MutexGuard<'_, ()> {
        match scope {
            Scope::Global => self.global_lock.lock().await,
            Scope::Project => self.project_lock.lock().await,
        }
    }

    async fn read(&self, location: &Location) -> Result<Collection, StoreError> {
        match location {
            Location::GlobalSlot(key) => {
                Ok(self.state.get(key).await?.map(codec::decode_value).unwrap_or_default())
            }
            Location::ProjectFile(path) => {
                Ok(read_optional(path).await?.map(|bytes| codec::decode(&bytes)).unwrap_or_default())
            }
            Location::Unavailable => Ok(Vec::new()),
        }
    }

    async fn write(&self, location: &Location, collection: &[RequestRecord]) -> Result<(), StoreError> {
        match location {
            Location::GlobalSlot(key) => self.state.update(key, codec::encode_value(collection)).await,
            Location::ProjectFile(path) => write_atomic(path, &codec::encode(collection)).await,
            Location::Unavailable => Ok(()),
        }
    }
}

/// Fresh random record identity.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

fn tag(collection: Collection, scope: Scope) -> Vec<RequestRecord> {
    collection.into_iter().map(|record| record.with_scope(scope)).collect()
}
