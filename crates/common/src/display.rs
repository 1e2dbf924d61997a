// Display hierarchy: the read-only section/leaf tree a host renders for
// browsing saved requests.

use serde::{Deserialize, Serialize};

use crate::types::{RequestRecord, Scope};

/// Host command that opens a create-or-edit session.
pub const OPEN_REQUEST_COMMAND: &str = "reqbook.openRequest";
/// Host command that clears every record in the global scope.
pub const CLEAR_ALL_COMMAND: &str = "reqbook.clearAll";

pub const CREATE_LABEL: &str = "New Request";
pub const CREATE_ICON: &str = "add";
pub const SECTION_ICON: &str = "folder";
pub const REQUEST_ICON: &str = "cloud";

/// Command a node runs when activated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeCommand {
    pub command: String,
    pub title: String,
    /// Record to edit; absent for a fresh session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RequestRecord>,
}

impl NodeCommand {
    pub fn open(record: Option<RequestRecord>) -> Self {
        let title = if record.is_some() { "Open Request" } else { CREATE_LABEL };
        Self { command: OPEN_REQUEST_COMMAND.to_string(), title: title.to_string(), record }
    }
}

/// The static "create new" affordance at the top of the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateNode {
    pub label: String,
    pub icon: String,
    pub command: NodeCommand,
}

impl Default for CreateNode {
    fn default() -> Self {
        Self {
            label: CREATE_LABEL.to_string(),
            icon: CREATE_ICON.to_string(),
            command: NodeCommand::open(None),
        }
    }
}

/// One saved request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeafNode {
    pub label: String,
    /// `"<method> <url>"`, present only when `label` is a real name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub icon: String,
    /// Carries the full record, so opening a leaf needs no store read.
    pub command: NodeCommand,
}

impl LeafNode {
    pub fn for_record(record: RequestRecord) -> Self {
        Self {
            label: record.label(),
            description: record.description(),
            icon: REQUEST_ICON.to_string(),
            command: NodeCommand::open(Some(record)),
        }
    }

    pub fn record(&self) -> Option<&RequestRecord> {
        self.command.record.as_ref()
    }
}

/// All saved requests of one scope, in stored order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionNode {
    pub scope: Scope,
    pub label: String,
    pub icon: String,
    pub items: Vec<LeafNode>,
}

impl SectionNode {
    pub fn new(scope: Scope, items: Vec<LeafNode>) -> Self {
        Self { scope, label: scope.label().to_string(), icon: SECTION_ICON.to_string(), items }
    }
}

/// Create node first, then one section per non-empty scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayHierarchy {
    pub create: CreateNode,
    #[serde(default)]
    pub sections: Vec<SectionNode>,
}

impl DisplayHierarchy {
    pub fn section(&self, scope: Scope) -> Option<&SectionNode> {
        self.sections.iter().find(|section| section.scope == scope)
    }

    /// Total number of request leaves across sections.
    pub fn leaf_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }
}
