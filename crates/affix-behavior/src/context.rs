//! `BehaviorCx` — the view a hook runs against.

use std::fmt;
use std::rc::Rc;

use affix_core::{BreakpointOracle, MediaQueryChange};
use affix_dom::{Document, ElementId};

use crate::config::BehaviorConfig;
use crate::definition::{Hook, HookKind};
use crate::instance::Instance;
use crate::{binds, options, BehaviorError, BehaviorResult};

// ── Trigger ───────────────────────────────────────────────────────────────────

/// Why the current hook is running.
///
/// All hooks share one signature; payload-carrying dispatches (breakpoint
/// changes, DOM events) expose their payload here.
#[derive(Clone, Debug)]
pub enum Trigger {
    /// An ordinary lifecycle transition (init, enable, destroy, …).
    Lifecycle,
    /// A breakpoint change, with the old and new tier names.
    MediaQuery(MediaQueryChange),
    /// A debounced viewport resize.
    Resize,
    /// A DOM event delivered to a listener registered with
    /// [`BehaviorCx::on`].
    DomEvent {
        event: String,
        target: ElementId,
    },
}

// ── EngineOp ──────────────────────────────────────────────────────────────────

/// Where a listener registration attaches.
#[derive(Clone, Debug)]
pub enum ListenTarget {
    /// The instance's own element.
    Own,
    /// An explicit element.
    Element(ElementId),
    /// Every declarative child with this name (resolved at apply time).
    Children(String),
    /// The document root (for page-wide events like `keydown`).
    Document,
}

/// A registry-shaped ask queued by a hook and applied by the engine after
/// the hook returns.
///
/// Hooks mutate the document directly through `cx.dom`, but the engine's
/// own maps are only ever touched by the engine — this is the one
/// documented path from behavior code back into the registry.
pub enum EngineOp {
    /// Instantiate another behavior on a node this instance manages.
    AddSubBehavior {
        name: String,
        element: ElementId,
        config: BehaviorConfig,
    },
    /// Register an event listener governed by the owner's cancellation
    /// token.
    Listen {
        owner_element: ElementId,
        owner_behavior: String,
        target: ListenTarget,
        event: String,
        handler: Hook,
        token: affix_core::CancellationToken,
    },
    /// Remove listeners matching (target, event, handler identity).
    Unlisten {
        owner_element: ElementId,
        owner_behavior: String,
        target: ListenTarget,
        event: String,
        handler: Hook,
    },
}

impl fmt::Debug for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOp::AddSubBehavior { name, element, .. } => f
                .debug_struct("AddSubBehavior")
                .field("name", name)
                .field("element", element)
                .finish_non_exhaustive(),
            EngineOp::Listen { event, target, .. } => f
                .debug_struct("Listen")
                .field("event", event)
                .field("target", target)
                .finish_non_exhaustive(),
            EngineOp::Unlisten { event, target, .. } => f
                .debug_struct("Unlisten")
                .field("event", event)
                .field("target", target)
                .finish_non_exhaustive(),
        }
    }
}

// ── BehaviorCx ────────────────────────────────────────────────────────────────

/// The mutable view handed to every hook invocation.
///
/// Pairs one instance's state with the document, the breakpoint oracle,
/// and an op queue.  Also carries the lifecycle drivers the engine calls
/// (`run_init`, `run_destroy`, `invoke`) so every hook fires through the
/// same guarded paths.
pub struct BehaviorCx<'a> {
    /// Direct, synchronous document access.  Structural changes land in
    /// the mutation journal and are picked up on the next engine flush.
    pub dom: &'a mut Document,
    instance: &'a mut Instance,
    oracle: &'a dyn BreakpointOracle,
    ops: &'a mut Vec<EngineOp>,
    trigger: Trigger,
}

impl<'a> BehaviorCx<'a> {
    pub fn new(
        dom: &'a mut Document,
        instance: &'a mut Instance,
        oracle: &'a dyn BreakpointOracle,
        ops: &'a mut Vec<EngineOp>,
        trigger: Trigger,
    ) -> Self {
        Self {
            dom,
            instance,
            oracle,
            ops,
            trigger,
        }
    }

    // ── Identity and state ────────────────────────────────────────────────

    pub fn element(&self) -> ElementId {
        self.instance.element()
    }

    pub fn name(&self) -> &str {
        self.instance.name()
    }

    /// Why this hook is running (resize payloads, breakpoint changes, …).
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn is_enabled(&self) -> bool {
        self.instance.is_enabled()
    }

    pub fn is_intersecting(&self) -> bool {
        self.instance.is_intersecting()
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.instance.option(key)
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.instance.set_option(key, value);
    }

    // ── Enable / disable ──────────────────────────────────────────────────

    /// Transition to enabled.  A no-op while already enabled: the
    /// `enabled` hook fires exactly once per actual transition.
    pub fn enable(&mut self) -> BehaviorResult<()> {
        if self.instance.is_enabled() {
            return Ok(());
        }
        self.instance.set_enabled(true);
        self.invoke(HookKind::Enabled)
    }

    /// Transition to disabled.  A no-op while already disabled.
    pub fn disable(&mut self) -> BehaviorResult<()> {
        if !self.instance.is_enabled() {
            return Ok(());
        }
        self.instance.set_enabled(false);
        self.invoke(HookKind::Disabled)
    }

    /// Re-evaluate the `media` gate against the oracle and toggle
    /// enable/disable to match.  No-op for ungated instances.
    pub fn apply_media_gate(&mut self) -> BehaviorResult<()> {
        let Some(gate) = self.instance.media_gate().map(str::to_string) else {
            return Ok(());
        };
        let satisfied = self.is_breakpoint(&gate);
        if satisfied && !self.instance.is_enabled() {
            self.enable()
        } else if !satisfied && self.instance.is_enabled() {
            self.disable()
        } else {
            Ok(())
        }
    }

    // ── Breakpoints ───────────────────────────────────────────────────────

    /// Does `query` (e.g. `"md+"`) hold right now, per this instance's
    /// breakpoint ordering?
    pub fn is_breakpoint(&self, query: &str) -> bool {
        self.instance
            .breakpoints()
            .satisfies(query, &self.oracle.current())
    }

    // ── Children ──────────────────────────────────────────────────────────

    pub fn get_child(&self, name: &str) -> Option<ElementId> {
        self.instance.child_named(self.dom, name)
    }

    pub fn get_child_in(&self, name: &str, context: ElementId) -> Option<ElementId> {
        self.instance.child_named_in(self.dom, name, context)
    }

    pub fn get_children(&self, name: &str) -> Vec<ElementId> {
        self.instance.children_named(self.dom, name)
    }

    pub fn get_children_in(&self, name: &str, context: ElementId) -> Vec<ElementId> {
        self.instance.children_named_in(self.dom, name, context)
    }

    // ── Binds ─────────────────────────────────────────────────────────────

    pub fn bind(&self, key: &str) -> Option<&str> {
        self.instance.bind(key)
    }

    /// Write a bound value: synchronously syncs every matching `bindel` /
    /// `bindattr` descendant, then records the value.
    pub fn set_bind(&mut self, key: &str, value: impl fmt::Display) -> BehaviorResult<()> {
        let value = value.to_string();
        binds::update_binds(self.dom, self.instance, key, &value)
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Register an event listener tied to this instance's lifetime.
    ///
    /// Returns the boxed handler so it can be passed to [`off`][Self::off]
    /// later.  Cancellation is automatic at destroy; `off` exists for
    /// early removal only.
    pub fn on<F>(&mut self, target: ListenTarget, event: &str, handler: F) -> Hook
    where
        F: Fn(&mut BehaviorCx<'_>) -> BehaviorResult<()> + 'static,
    {
        let handler: Hook = Rc::new(handler);
        self.ops.push(EngineOp::Listen {
            owner_element: self.instance.element(),
            owner_behavior: self.instance.name().to_string(),
            target,
            event: event.to_string(),
            handler: Rc::clone(&handler),
            token: self.instance.token().clone(),
        });
        handler
    }

    /// Remove listeners registered for (target, event) with this exact
    /// handler.
    pub fn off(&mut self, target: ListenTarget, event: &str, handler: &Hook) {
        self.ops.push(EngineOp::Unlisten {
            owner_element: self.instance.element(),
            owner_behavior: self.instance.name().to_string(),
            target,
            event: event.to_string(),
            handler: Rc::clone(handler),
        });
    }

    // ── Registry delegation ───────────────────────────────────────────────

    /// Ask the engine to activate another behavior on a node this
    /// instance manages.  Applied after the current hook returns.
    pub fn add_sub_behavior(
        &mut self,
        name: impl Into<String>,
        element: ElementId,
        config: BehaviorConfig,
    ) {
        self.ops.push(EngineOp::AddSubBehavior {
            name: name.into(),
            element,
            config,
        });
    }

    // ── Method dispatch ───────────────────────────────────────────────────

    /// Invoke a named entry of the method table.
    pub fn call(&mut self, method: &str) -> BehaviorResult<()> {
        let def = Rc::clone(self.instance.def());
        match def.method(method) {
            Some(f) => {
                let f = Rc::clone(f);
                f(self)
            }
            None => Err(BehaviorError::UnknownMethod(method.to_string())),
        }
    }

    /// Invoke a lifecycle hook if present; absent hooks are a no-op.
    pub fn invoke(&mut self, kind: HookKind) -> BehaviorResult<()> {
        let def = Rc::clone(self.instance.def());
        match def.hook(kind) {
            Some(hook) => {
                let hook = Rc::clone(hook);
                hook(self)
            }
            None => Ok(()),
        }
    }

    // ── Engine-facing lifecycle drivers ───────────────────────────────────

    /// Full initialization: fold declarative options, run `init`, then
    /// either evaluate the media gate or enable unconditionally.
    ///
    /// A failing `init` hook aborts the remaining steps; the engine logs
    /// and the instance stays constructed-but-disabled.
    pub fn run_init(&mut self) -> BehaviorResult<()> {
        options::fold_data_options(self.dom, self.instance);
        self.invoke(HookKind::Init)?;
        if self.instance.media_gate().is_some() {
            self.apply_media_gate()
        } else {
            self.enable()
        }
    }

    /// Full teardown: cancel the token, disable if enabled, run
    /// `destroy`, clear state.  Teardown always completes; the first hook
    /// error (if any) is returned for the engine to log.
    pub fn run_destroy(&mut self) -> BehaviorResult<()> {
        self.instance.token().cancel();
        let mut first_err = None;
        if self.instance.is_enabled() {
            if let Err(e) = self.disable() {
                first_err = Some(e);
            }
        }
        if let Err(e) = self.invoke(HookKind::Destroy) {
            first_err.get_or_insert(e);
        }
        self.instance.clear_for_destroy();
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Record an intersection transition on the instance flag.
    pub fn mark_intersecting(&mut self, intersecting: bool) {
        self.instance.set_intersecting(intersecting);
    }
}
