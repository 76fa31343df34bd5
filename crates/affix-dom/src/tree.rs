//! `Document` — the arena tree and its structural operations.

use std::fmt;

use indextree::{Arena, NodeId};

use crate::node::{NodeData, NodeKind};
use crate::{DomError, DomResult, Mutation};

// ── ElementId ─────────────────────────────────────────────────────────────────

/// Opaque handle to a node in one [`Document`]'s arena.
///
/// `Copy + Eq + Hash`, so it works as a map key without ceremony.  Handles
/// are only meaningful against the document that issued them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ElementId(NodeId);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", usize::from(self.0))
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// The element tree plus its mutation journal.
///
/// Structure mutators record journal entries only for changes visible
/// from the connected tree; building up a detached fragment is silent
/// until the fragment is appended, at which point one `Added` record
/// covers the whole subtree — mirroring how `MutationObserver` reports.
pub struct Document {
    arena: Arena<NodeData>,
    root: ElementId,
    journal: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = ElementId(arena.new_node(NodeData::default()));
        Self {
            arena,
            root,
            journal: Vec::new(),
        }
    }

    /// The document root.  Not an element; never a valid behavior target.
    pub fn root(&self) -> ElementId {
        self.root
    }

    // ── Node creation ─────────────────────────────────────────────────────

    /// Create a detached element.  Append it to make it part of the page.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        ElementId(self.arena.new_node(NodeData::element(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> ElementId {
        ElementId(self.arena.new_node(NodeData::text(text)))
    }

    // ── Structure ─────────────────────────────────────────────────────────

    /// Append `child` (and its subtree) as the last child of `parent`.
    ///
    /// Journals `Added(child)` when `parent` is connected.
    pub fn append(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;
        if child == self.root {
            return Err(DomError::CannotMoveRoot);
        }
        parent.0.checked_append(child.0, &mut self.arena).map_err(|_| {
            DomError::NodeNotFound(child)
        })?;
        if self.is_connected(parent) {
            self.journal.push(Mutation::Added(child));
        }
        Ok(())
    }

    /// Detach `node` (and its subtree) from the tree.
    ///
    /// The subtree stays alive in the arena — removal handlers can still
    /// walk it.  Journals `Removed(node)` when the node was connected.
    pub fn detach(&mut self, node: ElementId) -> DomResult<()> {
        self.ensure_exists(node)?;
        if node == self.root {
            return Err(DomError::CannotMoveRoot);
        }
        let was_connected = self.is_connected(node);
        node.0.detach(&mut self.arena);
        if was_connected {
            self.journal.push(Mutation::Removed(node));
        }
        Ok(())
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn exists(&self, node: ElementId) -> bool {
        self.arena.get(node.0).is_some_and(|n| !n.is_removed())
    }

    pub fn is_element(&self, node: ElementId) -> bool {
        self.data(node).is_some_and(NodeData::is_element)
    }

    pub fn tag(&self, node: ElementId) -> Option<&str> {
        match &self.data(node)?.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn parent(&self, node: ElementId) -> Option<ElementId> {
        self.arena.get(node.0)?.parent().map(ElementId)
    }

    /// `true` while `node` is reachable from the document root.
    pub fn is_connected(&self, node: ElementId) -> bool {
        if !self.exists(node) {
            return false;
        }
        node.0.ancestors(&self.arena).any(|a| a == self.root.0)
    }

    pub fn children(&self, node: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        node.0.children(&self.arena).map(ElementId)
    }

    /// Pre-order traversal of `node` and everything below it.
    ///
    /// Works on detached subtrees too, which is what removal handling
    /// relies on.
    pub fn subtree(&self, node: ElementId) -> Vec<ElementId> {
        if !self.exists(node) {
            return Vec::new();
        }
        node.0.descendants(&self.arena).map(ElementId).collect()
    }

    // ── Attributes ────────────────────────────────────────────────────────

    pub fn attribute(&self, node: ElementId, name: &str) -> Option<&str> {
        self.data(node)?.attr(name)
    }

    pub fn set_attribute(&mut self, node: ElementId, name: &str, value: &str) -> DomResult<()> {
        self.element_data_mut(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: ElementId, name: &str) -> DomResult<()> {
        self.element_data_mut(node)?.remove_attr(name);
        Ok(())
    }

    /// All attributes of `node`, in insertion order.  Empty for non-elements.
    pub fn attributes(&self, node: ElementId) -> Vec<(String, String)> {
        match self.data(node) {
            Some(data) => data
                .attrs()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            None => Vec::new(),
        }
    }

    // ── Class list ────────────────────────────────────────────────────────

    pub fn has_class(&self, node: ElementId, class: &str) -> bool {
        self.data(node).is_some_and(|d| d.has_class(class))
    }

    pub fn add_class(&mut self, node: ElementId, class: &str) -> DomResult<()> {
        self.element_data_mut(node)?.add_class(class);
        Ok(())
    }

    pub fn remove_class(&mut self, node: ElementId, class: &str) -> DomResult<()> {
        self.element_data_mut(node)?.remove_class(class);
        Ok(())
    }

    // ── Text ──────────────────────────────────────────────────────────────

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: ElementId) -> String {
        if !self.exists(node) {
            return String::new();
        }
        let mut out = String::new();
        for id in node.0.descendants(&self.arena) {
            if let Some(node) = self.arena.get(id) {
                if let NodeKind::Text { text } = &node.get().kind {
                    out.push_str(text);
                }
            }
        }
        out
    }

    /// Replace `node`'s children with a single text node.
    ///
    /// The displaced children are detached (and journaled, when
    /// connected) like any other removal.
    pub fn set_text_content(&mut self, node: ElementId, text: &str) -> DomResult<()> {
        self.ensure_exists(node)?;
        let children: Vec<ElementId> = self.children(node).collect();
        for child in children {
            self.detach(child)?;
        }
        let text_node = self.create_text(text);
        self.append(node, text_node)
    }

    // ── Mutation journal ──────────────────────────────────────────────────

    /// Drain all journal entries recorded since the last call.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Number of undrained journal entries.
    pub fn pending_mutations(&self) -> usize {
        self.journal.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn data(&self, node: ElementId) -> Option<&NodeData> {
        let n = self.arena.get(node.0)?;
        if n.is_removed() { None } else { Some(n.get()) }
    }

    fn ensure_exists(&self, node: ElementId) -> DomResult<()> {
        if self.exists(node) {
            Ok(())
        } else {
            Err(DomError::NodeNotFound(node))
        }
    }

    fn element_data_mut(&mut self, node: ElementId) -> DomResult<&mut NodeData> {
        let n = self
            .arena
            .get_mut(node.0)
            .ok_or(DomError::NodeNotFound(node))?;
        if n.is_removed() {
            return Err(DomError::NodeNotFound(node));
        }
        let data = n.get_mut();
        if !data.is_element() {
            return Err(DomError::NotAnElement(node));
        }
        Ok(data)
    }
}

impl fmt::Debug for Document {
    /// Compact form: node count and journal depth, not the whole tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.arena.count())
            .field("pending_mutations", &self.journal.len())
            .finish()
    }
}
