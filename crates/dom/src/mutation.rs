use crate::document::NodeId;
use serde::Serialize;

/// One structural change captured while a [`Document`](crate::Document) is recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutationRecord {
    /// Children were added to and/or removed from `target`
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
}

impl MutationRecord {
    pub(crate) fn added(target: NodeId, node: NodeId) -> Self {
        Self::ChildList {
            target,
            added: vec![node],
            removed: Vec::new(),
        }
    }

    pub(crate) fn removed(target: NodeId, node: NodeId) -> Self {
        Self::ChildList {
            target,
            added: Vec::new(),
            removed: vec![node],
        }
    }

    /// Node whose child list changed
    pub fn target(&self) -> NodeId {
        match self {
            Self::ChildList { target, .. } => *target,
        }
    }

    pub fn added_nodes(&self) -> &[NodeId] {
        match self {
            Self::ChildList { added, .. } => added,
        }
    }

    pub fn removed_nodes(&self) -> &[NodeId] {
        match self {
            Self::ChildList { removed, .. } => removed,
        }
    }
}
