//! `Instance` — one live attachment of a definition to one element.

use std::collections::BTreeMap;
use std::rc::Rc;

use affix_core::{BreakpointOrder, CancellationToken};
use affix_dom::{dataset, query, Document, ElementId};

use crate::config::{BehaviorConfig, IntersectionOptions};
use crate::{BehaviorError, BehaviorResult, Definition};

/// Mutable per-(behavior, element) state.
///
/// The state machine is constructed → initialized → enabled ⇄ disabled →
/// destroyed.  `destroyed` is terminal; the engine drops the instance
/// right after.  All transitions run through [`BehaviorCx`][crate::BehaviorCx],
/// which pairs this state with the document so hooks can fire.
#[derive(Debug)]
pub struct Instance {
    def: Rc<Definition>,
    element: ElementId,
    options: BTreeMap<String, String>,
    intersection: IntersectionOptions,
    children: BTreeMap<String, ElementId>,
    breakpoints: BreakpointOrder,
    binds: BTreeMap<String, String>,
    token: CancellationToken,
    enabled: bool,
    intersecting: bool,
    destroyed: bool,
}

impl Instance {
    /// Bind `def` to `element`.
    ///
    /// Fails with [`BehaviorError::InvalidTarget`] unless `element` is a
    /// live element node — the document root and text nodes are not valid
    /// behavior targets.
    pub fn new(
        doc: &Document,
        element: ElementId,
        def: Rc<Definition>,
        config: BehaviorConfig,
        fallback_breakpoints: &BreakpointOrder,
    ) -> BehaviorResult<Self> {
        if !doc.is_element(element) {
            return Err(BehaviorError::InvalidTarget(element));
        }
        Ok(Self {
            def,
            element,
            options: config.options,
            intersection: config.intersection,
            children: config.children,
            breakpoints: config
                .breakpoints
                .unwrap_or_else(|| fallback_breakpoints.clone()),
            binds: BTreeMap::new(),
            token: CancellationToken::new(),
            enabled: false,
            intersecting: false,
            destroyed: false,
        })
    }

    // ── Identity ──────────────────────────────────────────────────────────

    pub fn def(&self) -> &Rc<Definition> {
        &self.def
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    // ── State flags ───────────────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_intersecting(&mut self, intersecting: bool) {
        self.intersecting = intersecting;
    }

    // ── Options ───────────────────────────────────────────────────────────

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// The breakpoint gate, when this instance is media-gated.
    pub fn media_gate(&self) -> Option<&str> {
        self.option("media")
    }

    /// Set an option.  Public for the engine's dev tooling; behaviors use
    /// `BehaviorCx::set_option`.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn intersection_options(&self) -> &IntersectionOptions {
        &self.intersection
    }

    pub fn breakpoints(&self) -> &BreakpointOrder {
        &self.breakpoints
    }

    // ── Binds ─────────────────────────────────────────────────────────────

    pub fn bind(&self, key: &str) -> Option<&str> {
        self.binds.get(key).map(String::as_str)
    }

    pub fn binds(&self) -> &BTreeMap<String, String> {
        &self.binds
    }

    pub(crate) fn set_bind_value(&mut self, key: &str, value: &str) {
        self.binds.insert(key.to_string(), value.to_string());
    }

    // ── Child lookup ──────────────────────────────────────────────────────

    /// First declarative child named `name`: a `children` config override
    /// wins over the `data-<behavior>-<name>` DOM lookup.
    pub fn child_named(&self, doc: &Document, name: &str) -> Option<ElementId> {
        self.child_named_in(doc, name, self.element)
    }

    /// Like [`child_named`][Self::child_named] with an explicit search
    /// context.
    pub fn child_named_in(
        &self,
        doc: &Document,
        name: &str,
        context: ElementId,
    ) -> Option<ElementId> {
        if let Some(&el) = self.children.get(name) {
            return Some(el);
        }
        query::by_attr(doc, context, &self.child_attr(name))
            .into_iter()
            .next()
    }

    /// All declarative children named `name`.
    pub fn children_named(&self, doc: &Document, name: &str) -> Vec<ElementId> {
        self.children_named_in(doc, name, self.element)
    }

    pub fn children_named_in(
        &self,
        doc: &Document,
        name: &str,
        context: ElementId,
    ) -> Vec<ElementId> {
        if let Some(&el) = self.children.get(name) {
            return vec![el];
        }
        query::by_attr(doc, context, &self.child_attr(name))
    }

    fn child_attr(&self, child_name: &str) -> String {
        dataset::data_attr(&format!(
            "{}-{}",
            self.name().to_ascii_lowercase(),
            child_name.to_ascii_lowercase()
        ))
    }

    // ── Teardown ──────────────────────────────────────────────────────────

    /// Clear owned state and mark the instance terminal.
    ///
    /// Dropping the maps here breaks any reference cycles the binds or
    /// child overrides may participate in before the engine drops the
    /// instance itself.
    pub(crate) fn clear_for_destroy(&mut self) {
        self.options.clear();
        self.binds.clear();
        self.children.clear();
        self.destroyed = true;
    }
}
