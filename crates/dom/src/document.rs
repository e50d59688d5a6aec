use crate::error::{DomError, Result};
use crate::link_document::{LinkDocument, ANCHOR_TAG};
use crate::mutation::MutationRecord;
use serde::Serialize;
use std::fmt;

/// Handle to a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Single attribute of an element. Names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    tag_name: String,
    attributes: Vec<Attribute>,
}

impl Element {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// Lowercased tag name
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// ASCII case-insensitive tag comparison
    pub fn is(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => {
                if attr.value != value {
                    attr.value = value.to_string();
                }
            }
            None => self.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                value: value.to_string(),
            }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attributes
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(pos).value)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed document tree.
///
/// Nodes are never freed: removing a child detaches it, and the id stays
/// valid so it can be re-inserted. Structural changes under attached parents
/// are captured as [`MutationRecord`]s while recording is on.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    recording: bool,
    records: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
            root: NodeId(0),
            recording: false,
            records: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes ever created, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push_node(NodeKind::Element(Element::new(tag_name)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Text(text.into()))
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(DomError::InvalidNode(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|node| &node.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id)? {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag_name)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Children of `id`; empty for unknown ids and text nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// True if `node` is `ancestor` or lies beneath it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// True if the node is reachable from the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    fn can_have_children(&self, id: NodeId) -> Result<()> {
        match &self.node(id)?.kind {
            NodeKind::Text(_) => Err(DomError::CannotHaveChildren(id)),
            _ => Ok(()),
        }
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.can_have_children(parent)?;
        self.node(child)?;
        if child == self.root {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        // parent must not sit inside child's subtree
        if self.contains(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
            self.record(old_parent, |target| MutationRecord::removed(target, child));
        }
    }

    fn record(&mut self, target: NodeId, make: impl FnOnce(NodeId) -> MutationRecord) {
        if self.recording && self.is_connected(target) {
            self.records.push(make(target));
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.record(parent, |target| MutationRecord::added(target, child));
        Ok(())
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        self.node(reference)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        if child == reference {
            return Ok(());
        }

        self.detach(child);
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(pos, child);
        self.record(parent, |target| MutationRecord::added(target, child));
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Create an element with the given attributes and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId> {
        let id = self.create_element(tag_name);
        if let Some(element) = self.element_mut(id) {
            for (name, value) in attributes {
                element.set_attribute(name, value);
            }
        }
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attribute(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.node(id)?;
        let element = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        element.set_attribute(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>> {
        self.node(id)?;
        let element = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        Ok(element.remove_attribute(name))
    }

    /// Pre-order walk of `root` and everything beneath it
    pub fn inclusive_descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.nodes.get(root.0).is_none() {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Snapshot of attached elements named `tag_name`, in document order
    pub fn elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        self.elements_by_tag_name_from(self.root, tag_name)
    }

    /// Snapshot of elements named `tag_name` strictly beneath `root`
    pub fn elements_by_tag_name_from(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.inclusive_descendants(root)
            .into_iter()
            .skip(1)
            .filter(|id| self.element(*id).is_some_and(|element| element.is(tag_name)))
            .collect()
    }

    /// View of `root` and its descendants as a standalone link document
    pub fn subtree(&mut self, root: NodeId) -> Subtree<'_> {
        Subtree { doc: self, root }
    }

    /// Begin capturing child-list mutations under attached parents
    pub fn start_recording(&mut self) {
        self.recording = true;
    }

    /// Stop capturing and drop anything not yet taken
    pub fn stop_recording(&mut self) {
        self.recording = false;
        self.records.clear();
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }
}

impl LinkDocument for Document {
    type Anchor = NodeId;

    fn anchors(&self) -> Vec<NodeId> {
        self.elements_by_tag_name(ANCHOR_TAG)
    }

    fn attribute(&self, anchor: NodeId, name: &str) -> Option<&str> {
        Document::attribute(self, anchor, name)
    }

    fn set_attribute(&mut self, anchor: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(anchor) {
            element.set_attribute(name, value);
        }
    }
}

/// A node and its descendants, attached or not, exposed as a [`LinkDocument`].
pub struct Subtree<'a> {
    doc: &'a mut Document,
    root: NodeId,
}

impl Subtree<'_> {
    pub fn root(&self) -> NodeId {
        self.root
    }
}

impl LinkDocument for Subtree<'_> {
    type Anchor = NodeId;

    fn anchors(&self) -> Vec<NodeId> {
        self.doc
            .inclusive_descendants(self.root)
            .into_iter()
            .filter(|id| self.doc.element(*id).is_some_and(|element| element.is(ANCHOR_TAG)))
            .collect()
    }

    fn attribute(&self, anchor: NodeId, name: &str) -> Option<&str> {
        self.doc.attribute(anchor, name)
    }

    fn set_attribute(&mut self, anchor: NodeId, name: &str, value: &str) {
        LinkDocument::set_attribute(&mut *self.doc, anchor, name, value);
    }
}
