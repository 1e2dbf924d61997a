// Presentation projector: rebuilds the display hierarchy from both scopes.
//
// Stateless. Each call re-reads both scopes in full; hosts call it again
// after every mutation instead of patching a previous tree.

use reqbook_common::display::{CreateNode, DisplayHierarchy, LeafNode, SectionNode};
use reqbook_common::types::Scope;

use crate::store::RequestStore;

pub async fn project(store: &RequestStore) -> DisplayHierarchy {
    let mut sections = Vec::new();
    for scope in Scope::SEARCH_ORDER {
        let records = store.list(scope).await;
        if records.is_empty() {
            continue;
        }
        let items = records.into_iter().map(LeafNode::for_record).collect();
        sections.push(SectionNode::new(scope, items));
    }
    DisplayHierarchy { create: CreateNode::default(), sections }
}
