//! The declarative marker scan.
//!
//! Two passes over a subtree.  Eager: the root plus every descendant
//! carrying the eager marker gets each whitespace-separated behavior name
//! activated in declaration order (duplicates are no-ops downstream).
//! Lazy: the same shape over the lazy marker, but names are recorded with
//! their optional `data-<name>-lazymedia` gate and the element is handed
//! to the lazy tracker for intersection observation instead of being
//! activated.  The document root itself is never lazily observed.
//!
//! Marker suffixes are configurable and case-normalized the way a
//! browser's dataset API would ([`affix_dom::dataset`]), so a suffix
//! configured as `behaviorLazy` and markup written as
//! `data-behavior-lazy` meet in the middle.

use affix_dom::{dataset, query, ElementId};
use log::warn;

use crate::Engine;

impl Engine {
    /// Scan `root` and its descendants for behavior markers.
    pub(crate) fn scan(&mut self, root: ElementId) {
        if !self.dom.exists(root) {
            return;
        }
        // Text nodes can land here via mutation batches; nothing to scan.
        if !self.dom.is_element(root) && root != self.dom.root() {
            return;
        }

        // ── Eager pass ────────────────────────────────────────────────────
        let eager_attr = dataset::data_attr(&self.options.data_attr);
        let mut nodes = vec![root];
        nodes.extend(query::by_attr(&self.dom, root, &eager_attr));
        for node in nodes {
            for name in self.marker_names(node, &eager_attr) {
                let config = self.default_config();
                if let Err(e) = self.activate_with_config(&name, node, config) {
                    warn!("behavior '{name}' on {node}: {e}");
                }
            }
        }

        // ── Lazy pass ─────────────────────────────────────────────────────
        let lazy_attr = dataset::data_attr(&self.options.lazy_attr);
        let mut lazy_nodes = vec![root];
        lazy_nodes.extend(query::by_attr(&self.dom, root, &lazy_attr));
        for node in lazy_nodes {
            if node == self.dom.root() {
                continue;
            }
            for name in self.marker_names(node, &lazy_attr) {
                let gate_attr =
                    dataset::data_attr(&format!("{}-lazymedia", name.to_ascii_lowercase()));
                let gate = self.dom.attribute(node, &gate_attr).map(str::to_string);
                self.lazy.insert(node, &name, gate);
            }
        }
    }

    /// Whitespace-split behavior names from a marker attribute.
    fn marker_names(&self, node: ElementId, attr: &str) -> Vec<String> {
        match self.dom.attribute(node, attr) {
            Some(value) => value.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }
}
