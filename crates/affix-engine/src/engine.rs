//! The `Engine` struct and its reaction paths.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};

use affix_behavior::{
    BehaviorConfig, BehaviorCx, Definition, EngineOp, HookKind, Instance, IntersectionOptions,
    ListenTarget, Trigger,
};
use affix_core::{BreakpointOracle, BreakpointOrder, MediaQueryChange, Millis};
use affix_dom::{Document, ElementId, Mutation};

use crate::debounce::ResizeDebouncer;
use crate::events::{EventHub, Listener};
use crate::lazy::LazyTracker;
use crate::resolver::{DefinitionResolver, ImportError, ResolveOutcome};
use crate::{EngineBuilder, EngineResult};

// ── EngineOptions ─────────────────────────────────────────────────────────────

/// Engine-wide knobs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineOptions {
    /// Marker attribute suffix for eager activation (`data-<data_attr>`).
    pub data_attr: String,
    /// Marker attribute suffix for lazy activation.
    pub lazy_attr: String,
    /// Default per-instance intersection options.
    pub intersection: IntersectionOptions,
    /// Quiet period before a resize burst is considered finished.
    pub resize_debounce_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            data_attr: "behavior".to_string(),
            lazy_attr: "behavior-lazy".to_string(),
            intersection: IntersectionOptions::default(),
            resize_debounce_ms: 250,
        }
    }
}

// ── Internal records ──────────────────────────────────────────────────────────

/// An activation queued while its definition import is outstanding.
pub(crate) struct PendingActivation {
    pub element: ElementId,
    pub config: BehaviorConfig,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The behavior registry and lifecycle engine.
///
/// One engine owns one [`Document`] plus all registry state — there is no
/// ambient/global registry, so tests run any number of engines side by
/// side and dropping the engine disposes everything.
///
/// Create via [`EngineBuilder`].
pub struct Engine {
    pub(crate) options: EngineOptions,
    pub(crate) dom: Document,
    pub(crate) oracle: Box<dyn BreakpointOracle>,
    pub(crate) resolver: Box<dyn DefinitionResolver>,
    pub(crate) breakpoints: BreakpointOrder,

    /// name → definition, populated by registration or lazy import.
    pub(crate) definitions: FxHashMap<String, Rc<Definition>>,
    /// Names registered or import-in-flight.  Failed imports are evicted
    /// so out-of-band registration can retry later.
    pub(crate) known_names: FxHashSet<String>,
    /// element → (behavior name → live instance).  The inner map is
    /// ordered so multi-behavior teardown runs in a deterministic order.
    pub(crate) active: FxHashMap<ElementId, BTreeMap<String, Instance>>,
    /// name → activations queued while that name's import is outstanding.
    pub(crate) pending: FxHashMap<String, Vec<PendingActivation>>,
    /// Deferred lazy activations and their intersection state.
    pub(crate) lazy: LazyTracker,
    /// Elements whose instances registered intersection hooks:
    /// element → behavior names watching it.
    pub(crate) io_watch: FxHashMap<ElementId, Vec<String>>,

    pub(crate) hub: EventHub,
    pub(crate) debounce: ResizeDebouncer,
    /// Last tier seen, for building change notifications.
    pub(crate) current_breakpoint: String,
    /// Set once by the first registration; gates mutation processing.
    pub(crate) observing: bool,
}

impl Engine {
    pub fn builder(
        dom: Document,
        oracle: impl BreakpointOracle + 'static,
    ) -> EngineBuilder {
        EngineBuilder::new(dom, oracle)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn dom(&self) -> &Document {
        &self.dom
    }

    /// Mutable document access for the host.  Structural changes are
    /// picked up by the next [`flush`][Self::flush].
    pub fn dom_mut(&mut self) -> &mut Document {
        &mut self.dom
    }

    pub fn current_breakpoint(&self) -> &str {
        &self.current_breakpoint
    }

    /// `true` if an instance of `name` is live on `element`.
    pub fn is_active(&self, name: &str, element: ElementId) -> bool {
        self.active
            .get(&element)
            .is_some_and(|m| m.contains_key(name))
    }

    /// `true` if the instance of `name` on `element` is currently in its
    /// enabled state.  `false` when disabled or not active at all.
    pub fn instance_enabled(&self, name: &str, element: ElementId) -> bool {
        self.active
            .get(&element)
            .and_then(|m| m.get(name))
            .is_some_and(Instance::is_enabled)
    }

    /// Behavior names with an import currently outstanding.
    pub fn pending_imports(&self) -> Vec<&str> {
        self.pending.keys().map(String::as_str).collect()
    }

    /// `true` if a definition for `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of elements currently observed for lazy activation.
    pub fn lazy_observed_count(&self) -> usize {
        self.lazy.observed_count()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register definitions, then scan the whole document and install
    /// mutation observing (idempotently).
    ///
    /// A name whose import is in flight is completed by its registration;
    /// a name already registered is skipped.
    pub fn add_behaviors(&mut self, defs: impl IntoIterator<Item = Definition>) {
        let mut added = false;
        for def in defs {
            let name = def.name().to_string();
            if self.definitions.contains_key(&name) {
                continue;
            }
            if self.known_names.contains(&name) {
                self.finish_import(&name, Ok(def));
            } else {
                self.known_names.insert(name.clone());
                self.definitions.insert(name, Rc::new(def));
            }
            added = true;
        }
        if added {
            self.observing = true;
            let root = self.dom.root();
            self.scan(root);
        }
    }

    pub fn add_behavior(&mut self, def: Definition) {
        self.add_behaviors(std::iter::once(def));
    }

    // ── Activation ────────────────────────────────────────────────────────

    /// Activate `name` on `element` with the engine's default config.
    pub fn activate(&mut self, name: &str, element: ElementId) -> EngineResult<()> {
        let config = self.default_config();
        self.activate_with_config(name, element, config)
    }

    /// Activate `name` on `element`.
    ///
    /// Unknown names start an import and defer.  A second activation of a
    /// live (name, element) pair is a silent no-op: at most one instance
    /// of a given name is ever live per element.  Only a structurally
    /// invalid target fails the call; hook errors are logged and
    /// recovered here.
    pub fn activate_with_config(
        &mut self,
        name: &str,
        element: ElementId,
        config: BehaviorConfig,
    ) -> EngineResult<()> {
        if !self.definitions.contains_key(name) {
            self.request_import(name, element, config);
            return Ok(());
        }
        if self.is_active(name, element) {
            return Ok(());
        }
        let def = Rc::clone(&self.definitions[name]);
        let instance = Instance::new(&self.dom, element, def, config, &self.breakpoints)?;
        self.active
            .entry(element)
            .or_default()
            .insert(name.to_string(), instance);
        self.init_instance(element, name);
        Ok(())
    }

    fn init_instance(&mut self, element: ElementId, name: &str) {
        let outcome = self.with_instance_cx(element, name, Trigger::Lifecycle, |cx| cx.run_init());
        match outcome {
            None => return,
            Some(Err(e)) => {
                warn!("behavior '{name}' failed to initialize on {element}: {e}");
                return;
            }
            Some(Ok(())) => {}
        }

        // Subscriptions come from post-fold state: a `media` option may
        // have arrived via data attribute.
        let Some(instance) = self.active.get(&element).and_then(|m| m.get(name)) else {
            return;
        };
        let def = Rc::clone(instance.def());
        let token = instance.token().clone();
        let gated = instance.media_gate().is_some();

        if def.has_hook(HookKind::Resized) {
            self.hub.subscribe_resized(element, name, token.clone());
        }
        if def.has_hook(HookKind::MediaQueryUpdated) || gated {
            self.hub.subscribe_media(element, name, token);
        }
        if def.wants_intersection() {
            self.io_watch
                .entry(element)
                .or_default()
                .push(name.to_string());
        }
    }

    // ── Destruction ───────────────────────────────────────────────────────

    /// Destroy one instance: cancel its token, run its teardown hooks,
    /// release its registrations, drop it from the registry.
    pub fn destroy(&mut self, name: &str, element: ElementId) {
        let outcome = self.with_instance_cx(element, name, Trigger::Lifecycle, |cx| cx.run_destroy());
        match outcome {
            None => {
                warn!("no behavior '{name}' instance on {element}");
                return;
            }
            Some(Err(e)) => warn!("behavior '{name}' teardown on {element} reported: {e}"),
            Some(Ok(())) => {}
        }

        if let Some(by_name) = self.active.get_mut(&element) {
            by_name.remove(name);
            if by_name.is_empty() {
                self.active.remove(&element);
            }
        }
        if let Some(names) = self.io_watch.get_mut(&element) {
            names.retain(|n| n != name);
            if names.is_empty() {
                self.io_watch.remove(&element);
            }
        }
        self.hub.sweep();
    }

    /// Destroy every instance rooted at or inside `root`, and drop all
    /// lazy/intersection tracking for the subtree.  Works on detached
    /// subtrees — that is the removal-reaction path.
    fn destroy_subtree(&mut self, root: ElementId) {
        for node in self.dom.subtree(root) {
            let names: Vec<String> = self
                .active
                .get(&node)
                .map(|m| m.keys().cloned().collect())
                .unwrap_or_default();
            for name in names {
                self.destroy(&name, node);
            }
            self.lazy.unobserve(node);
            self.io_watch.remove(&node);
        }
    }

    // ── Mutation reaction ─────────────────────────────────────────────────

    /// Drain the document's mutation journal and react: every removal in
    /// the batch is handled before any addition, so an instance created
    /// by an add in the same batch can't be torn down by an earlier
    /// remove.
    ///
    /// Until the first registration installs observing, drained batches
    /// are discarded.
    pub fn flush(&mut self) {
        let batch = self.dom.take_mutations();
        if !self.observing {
            return;
        }
        for mutation in &batch {
            if let Mutation::Removed(node) = mutation {
                self.destroy_subtree(*node);
            }
        }
        for mutation in &batch {
            if let Mutation::Added(node) = mutation {
                self.scan(*node);
            }
        }
    }

    // ── Lazy import ───────────────────────────────────────────────────────

    fn request_import(&mut self, name: &str, element: ElementId, config: BehaviorConfig) {
        if self.known_names.contains(name) {
            // Import already in flight — just join the queue.
            if let Some(queue) = self.pending.get_mut(name) {
                queue.push(PendingActivation { element, config });
            }
            return;
        }
        self.known_names.insert(name.to_string());
        self.pending
            .insert(name.to_string(), vec![PendingActivation { element, config }]);
        match self.resolver.request(name) {
            ResolveOutcome::Ready(def) => self.finish_import(name, Ok(def)),
            ResolveOutcome::Pending => {}
            ResolveOutcome::Unavailable => {
                self.finish_import(name, Err(ImportError::NotFound(name.to_string())));
            }
        }
    }

    /// Deliver the outcome of an outstanding import.
    ///
    /// On success, every activation queued while the import was pending
    /// runs in arrival order.  On failure — or if the delivered
    /// definition answers to a different name — the name is evicted from
    /// the known set so a later registration is not silently swallowed,
    /// and the queue is dropped with one warning.
    pub fn finish_import(&mut self, name: &str, result: Result<Definition, ImportError>) {
        let queued = self.pending.remove(name).unwrap_or_default();
        match result {
            Ok(def) if def.name() == name => {
                self.definitions.insert(name.to_string(), Rc::new(def));
                for activation in queued {
                    if let Err(e) =
                        self.activate_with_config(name, activation.element, activation.config)
                    {
                        warn!("behavior '{name}' on {}: {e}", activation.element);
                    }
                }
            }
            Ok(def) => {
                warn!(
                    "tried to import '{name}', but it seems to not be a behavior (module exposes '{}')",
                    def.name()
                );
                self.known_names.remove(name);
            }
            Err(err) => {
                warn!("no loaded behavior called '{name}': {err}");
                self.known_names.remove(name);
            }
        }
    }

    // ── Intersection reaction ─────────────────────────────────────────────

    /// Host-delivered intersection entries, shared by the lazy tracker
    /// and per-instance observers.
    pub fn intersection_changed(&mut self, entries: &[(ElementId, bool)]) {
        for &(element, intersecting) in entries {
            if self.lazy.is_observed(element) {
                self.lazy.set_intersecting(element, intersecting);
                if intersecting {
                    self.sweep_lazy(element);
                }
            }
            if let Some(names) = self.io_watch.get(&element).cloned() {
                for name in names {
                    self.dispatch_intersection(element, &name, intersecting);
                }
            }
        }
    }

    fn dispatch_intersection(&mut self, element: ElementId, name: &str, intersecting: bool) {
        let outcome = self.with_instance_cx(element, name, Trigger::Lifecycle, |cx| {
            if intersecting == cx.is_intersecting() {
                return Ok(());
            }
            cx.mark_intersecting(intersecting);
            cx.invoke(if intersecting {
                HookKind::IntersectionIn
            } else {
                HookKind::IntersectionOut
            })
        });
        if let Some(Err(e)) = outcome {
            warn!("behavior '{name}' intersection hook on {element}: {e}");
        }
    }

    /// Activate whatever is eligible in one element's pending lazy set:
    /// gate unset, or satisfied at the current tier.  Skips elements not
    /// currently intersecting.  Observation stops when the set empties.
    fn sweep_lazy(&mut self, element: ElementId) {
        if !self.lazy.is_intersecting(element) {
            return;
        }
        let Some(entries) = self.lazy.entries(element) else {
            return;
        };
        let current = self.oracle.current();
        for (name, gate) in entries {
            let eligible = match &gate {
                None => true,
                Some(g) => self.breakpoints.satisfies(g, &current),
            };
            if !eligible {
                continue;
            }
            let config = self.default_config();
            if let Err(e) = self.activate_with_config(&name, element, config) {
                warn!("lazy behavior '{name}' on {element}: {e}");
            }
            self.lazy.resolve(element, &name);
        }
        if self.lazy.pending_count(element) == 0 {
            self.lazy.unobserve(element);
        }
    }

    // ── Breakpoint reaction ───────────────────────────────────────────────

    /// The oracle's tier changed (host-notified, or detected by the
    /// resize pipeline).  Re-evaluates lazy gates first — a breakpoint
    /// change can satisfy a gate for an element that is already
    /// intersecting — then notifies subscribed instances.
    pub fn breakpoint_changed(&mut self) {
        let to = self.oracle.current();
        if to == self.current_breakpoint {
            return;
        }
        let from = std::mem::replace(&mut self.current_breakpoint, to.clone());

        for element in self.lazy.observed_elements() {
            self.sweep_lazy(element);
        }

        let change = MediaQueryChange {
            from: Some(from),
            to,
        };
        for (element, name) in self.hub.media_subscribers() {
            self.dispatch_media(element, &name, change.clone());
        }
    }

    fn dispatch_media(&mut self, element: ElementId, name: &str, change: MediaQueryChange) {
        let outcome = self.with_instance_cx(element, name, Trigger::MediaQuery(change), |cx| {
            cx.invoke(HookKind::MediaQueryUpdated)?;
            cx.apply_media_gate()
        });
        if let Some(Err(e)) = outcome {
            warn!("behavior '{name}' media-query hook on {element}: {e}");
        }
    }

    // ── Resize pipeline ───────────────────────────────────────────────────

    /// A raw viewport resize happened at `now`.  Cheap; just re-arms the
    /// debouncer.
    pub fn viewport_resized(&mut self, now: Millis) {
        self.debounce.note(now);
    }

    /// Advance the debounce clock.  When a resize burst has quiesced:
    /// one `resized` notification to subscribed instances, then a
    /// breakpoint re-check.
    pub fn poll(&mut self, now: Millis) {
        if !self.debounce.fire(now) {
            return;
        }
        for (element, name) in self.hub.resized_subscribers() {
            let outcome =
                self.with_instance_cx(element, &name, Trigger::Resize, |cx| {
                    cx.invoke(HookKind::Resized)
                });
            if let Some(Err(e)) = outcome {
                warn!("behavior '{name}' resized hook on {element}: {e}");
            }
        }
        self.breakpoint_changed();
    }

    // ── DOM events ────────────────────────────────────────────────────────

    /// Deliver a DOM event on `element` to every live listener registered
    /// through `cx.on(…)`.
    pub fn dispatch_event(&mut self, element: ElementId, event: &str) {
        let hits = self.hub.listeners_for(element, event);
        for (owner_element, owner_behavior, handler) in hits {
            let trigger = Trigger::DomEvent {
                event: event.to_string(),
                target: element,
            };
            let outcome =
                self.with_instance_cx(owner_element, &owner_behavior, trigger, |cx| handler(cx));
            if let Some(Err(e)) = outcome {
                warn!("behavior '{owner_behavior}' {event:?} handler on {element}: {e}");
            }
        }
    }

    // ── Dispatch plumbing ─────────────────────────────────────────────────

    /// Run `f` against one instance's hook context, then apply whatever
    /// ops the hook queued.  Returns `None` when the instance is gone —
    /// a destroyed-mid-batch instance simply stops receiving dispatches.
    pub(crate) fn with_instance_cx<R>(
        &mut self,
        element: ElementId,
        behavior: &str,
        trigger: Trigger,
        f: impl FnOnce(&mut BehaviorCx<'_>) -> R,
    ) -> Option<R> {
        let mut ops = Vec::new();
        let result = {
            // Field-level borrows so the compiler sees disjoint access.
            let Engine {
                dom,
                active,
                oracle,
                ..
            } = self;
            match active.get_mut(&element).and_then(|m| m.get_mut(behavior)) {
                None => None,
                Some(instance) => {
                    let mut cx = BehaviorCx::new(dom, instance, &**oracle, &mut ops, trigger);
                    Some(f(&mut cx))
                }
            }
        };
        if result.is_some() {
            self.apply_ops(ops);
        }
        result
    }

    /// Apply ops queued during a hook.  `AddSubBehavior` re-enters
    /// activation (which may dispatch `init` and queue further ops —
    /// applied recursively before this loop continues).
    fn apply_ops(&mut self, ops: Vec<EngineOp>) {
        for op in ops {
            match op {
                EngineOp::AddSubBehavior {
                    name,
                    element,
                    config,
                } => {
                    if let Err(e) = self.activate_with_config(&name, element, config) {
                        warn!("sub-behavior '{name}' on {element}: {e}");
                    }
                }
                EngineOp::Listen {
                    owner_element,
                    owner_behavior,
                    target,
                    event,
                    handler,
                    token,
                } => {
                    let targets =
                        self.resolve_listen_targets(owner_element, &owner_behavior, &target);
                    if targets.is_empty() {
                        warn!("{owner_behavior}:on - no DOM node found for {event:?} listener");
                    }
                    for t in targets {
                        self.hub.add_listener(Listener {
                            target: t,
                            event: event.clone(),
                            handler: Rc::clone(&handler),
                            owner_element,
                            owner_behavior: owner_behavior.clone(),
                            token: token.clone(),
                        });
                    }
                }
                EngineOp::Unlisten {
                    owner_element,
                    owner_behavior,
                    target,
                    event,
                    handler,
                } => {
                    let targets =
                        self.resolve_listen_targets(owner_element, &owner_behavior, &target);
                    self.hub.remove_listeners(&targets, &event, &handler);
                }
            }
        }
    }

    fn resolve_listen_targets(
        &self,
        owner_element: ElementId,
        owner_behavior: &str,
        target: &ListenTarget,
    ) -> Vec<ElementId> {
        match target {
            ListenTarget::Own => vec![owner_element],
            ListenTarget::Element(el) => vec![*el],
            ListenTarget::Document => vec![self.dom.root()],
            ListenTarget::Children(name) => self
                .active
                .get(&owner_element)
                .and_then(|m| m.get(owner_behavior))
                .map(|instance| instance.children_named(&self.dom, name))
                .unwrap_or_default(),
        }
    }

    // ── Defaults ──────────────────────────────────────────────────────────

    pub(crate) fn default_config(&self) -> BehaviorConfig {
        BehaviorConfig {
            options: BTreeMap::new(),
            intersection: self.options.intersection.clone(),
            children: BTreeMap::new(),
            breakpoints: None,
        }
    }
}
