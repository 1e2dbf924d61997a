// Cross-scope lookup for callers that only hold a record id.
//
// Scopes are searched in `Scope::SEARCH_ORDER` (global, then project). An id
// present in both scopes resolves to global.

use reqbook_common::types::{RequestRecord, Scope};
use tracing::debug;

use super::{RequestStore, StoreError};

/// Remove `id` from the first scope that holds it.
///
/// Returns the scope it was removed from, or `None` when no scope had it.
/// Later scopes are not touched once a removal succeeds.
pub async fn locate_and_remove(store: &RequestStore, id: &str) -> Result<Option<Scope>, StoreError> {
    for scope in Scope::SEARCH_ORDER {
        if store.remove(scope, id).await? {
            return Ok(Some(scope));
        }
    }
    debug!(id, "request not found in any scope");
    Ok(None)
}

/// Find `id` in the first scope that holds it.
pub async fn locate(store: &RequestStore, id: &str) -> Option<RequestRecord> {
    for scope in Scope::SEARCH_ORDER {
        if let Some(record) = store.get(scope, id).await {
            return Some(record);
        }
    }
    None
}
