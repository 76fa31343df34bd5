//! Per-node payload: kind, attributes, class list.

use smallvec::SmallVec;

/// What a node is.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    /// The document root.  Exactly one per [`Document`][crate::Document];
    /// carries no attributes and is not a valid behavior target.
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
}

/// A node's payload.
///
/// Attributes are stored inline — elements rarely carry more than a
/// handful — with names lowercased on write, matching HTML's
/// case-insensitive attribute model.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    pub kind: NodeKind,
    attrs: SmallVec<[(String, String); 4]>,
}

impl NodeData {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            attrs: SmallVec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            attrs: SmallVec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    // ── Attributes ────────────────────────────────────────────────────────

    pub fn attr(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name, value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        self.attrs.retain(|(n, _)| *n != name);
    }

    /// All `(name, value)` pairs in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    // ── Class list ────────────────────────────────────────────────────────

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {class}", existing.trim())
            }
            _ => class.to_string(),
        };
        self.set_attr("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let remaining: Vec<&str> = existing
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        self.set_attr("class", &remaining.join(" "));
    }
}
