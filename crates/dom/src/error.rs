use crate::document::NodeId;
use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors that can occur while building or editing a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// Node id does not belong to this document
    #[error("Invalid node: {0}")]
    InvalidNode(NodeId),

    /// Operation requires an element node
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// Text nodes cannot be parents
    #[error("Node {0} cannot have children")]
    CannotHaveChildren(NodeId),

    /// Reference node is not a direct child of the parent
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Inserting would make a node its own ancestor
    #[error("Inserting {child} under {parent} would create a cycle")]
    HierarchyCycle { parent: NodeId, child: NodeId },

    /// Failed to parse markup
    #[error("Parse error: {0}")]
    Parse(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl DomError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}
