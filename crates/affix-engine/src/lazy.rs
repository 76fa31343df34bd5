//! `LazyTracker` — deferred activations waiting on intersection.
//!
//! Each observed element carries the set of behavior names still waiting
//! to activate, each with an optional breakpoint gate, plus the element's
//! last reported intersection state.  The engine stops observing an
//! element the moment its pending set empties.

use std::collections::BTreeMap;

use affix_dom::ElementId;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub(crate) struct LazyTracker {
    /// element → (behavior name → optional breakpoint gate)
    entries: FxHashMap<ElementId, BTreeMap<String, Option<String>>>,
    /// element → last reported intersection state
    intersecting: FxHashMap<ElementId, bool>,
}

impl LazyTracker {
    /// Record a pending lazy behavior and begin observing its element.
    pub fn insert(&mut self, element: ElementId, name: &str, gate: Option<String>) {
        self.entries
            .entry(element)
            .or_default()
            .insert(name.to_string(), gate);
        self.intersecting.entry(element).or_insert(false);
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.entries.contains_key(&element)
    }

    pub fn observed_elements(&self) -> Vec<ElementId> {
        self.entries.keys().copied().collect()
    }

    pub fn observed_count(&self) -> usize {
        self.entries.len()
    }

    pub fn set_intersecting(&mut self, element: ElementId, intersecting: bool) {
        if let Some(flag) = self.intersecting.get_mut(&element) {
            *flag = intersecting;
        }
    }

    pub fn is_intersecting(&self, element: ElementId) -> bool {
        self.intersecting.get(&element).copied().unwrap_or(false)
    }

    /// Snapshot of an element's pending (name, gate) pairs, in name order.
    pub fn entries(&self, element: ElementId) -> Option<Vec<(String, Option<String>)>> {
        self.entries
            .get(&element)
            .map(|m| m.iter().map(|(n, g)| (n.clone(), g.clone())).collect())
    }

    /// Drop one resolved name from an element's pending set.
    pub fn resolve(&mut self, element: ElementId, name: &str) {
        if let Some(names) = self.entries.get_mut(&element) {
            names.remove(name);
        }
    }

    pub fn pending_count(&self, element: ElementId) -> usize {
        self.entries.get(&element).map_or(0, BTreeMap::len)
    }

    /// Stop observing an element entirely.
    pub fn unobserve(&mut self, element: ElementId) {
        self.entries.remove(&element);
        self.intersecting.remove(&element);
    }
}
