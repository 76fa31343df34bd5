//! `Definition` — the immutable blueprint for a behavior.
//!
//! A definition is a plain record: a name, an ordered method table, and a
//! lifecycle table.  Both tables map strings to [`Hook`] callbacks.
//! Lifecycle keys outside the eight recognized names are stored but never
//! invoked by the engine — unknown keys are a forward-compatible no-op,
//! not an error.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::context::BehaviorCx;
use crate::{BehaviorError, BehaviorResult};

/// The callback type shared by lifecycle hooks, methods, and event
/// handlers.
///
/// Hooks return `Result` so user code can fail with `?`; the engine
/// catches the error at its dispatch boundary, logs it with behavior and
/// element context, and moves on.
pub type Hook = Rc<dyn Fn(&mut BehaviorCx<'_>) -> BehaviorResult<()>>;

// ── HookKind ──────────────────────────────────────────────────────────────────

/// The eight lifecycle hooks the engine drives.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HookKind {
    Init,
    Enabled,
    Disabled,
    MediaQueryUpdated,
    IntersectionIn,
    IntersectionOut,
    Resized,
    Destroy,
}

impl HookKind {
    pub const ALL: [HookKind; 8] = [
        HookKind::Init,
        HookKind::Enabled,
        HookKind::Disabled,
        HookKind::MediaQueryUpdated,
        HookKind::IntersectionIn,
        HookKind::IntersectionOut,
        HookKind::Resized,
        HookKind::Destroy,
    ];

    /// The table key this hook is stored under.
    pub fn name(self) -> &'static str {
        match self {
            HookKind::Init => "init",
            HookKind::Enabled => "enabled",
            HookKind::Disabled => "disabled",
            HookKind::MediaQueryUpdated => "mediaQueryUpdated",
            HookKind::IntersectionIn => "intersectionIn",
            HookKind::IntersectionOut => "intersectionOut",
            HookKind::Resized => "resized",
            HookKind::Destroy => "destroy",
        }
    }

    pub fn from_name(name: &str) -> Option<HookKind> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

// ── Definition ────────────────────────────────────────────────────────────────

/// Immutable blueprint: name + method table + lifecycle table.
///
/// Cloning is cheap (the hooks are `Rc`s).  Once built, the tables are
/// never mutated — [`extend`] produces a *new* definition.
#[derive(Clone)]
pub struct Definition {
    name: String,
    methods: BTreeMap<String, Hook>,
    lifecycle: BTreeMap<String, Hook>,
}

impl Definition {
    /// Build a definition from pre-assembled tables.
    ///
    /// The name must be non-empty: it doubles as the lowercased prefix
    /// for all declarative attribute matching.
    pub fn new(
        name: impl Into<String>,
        methods: BTreeMap<String, Hook>,
        lifecycle: BTreeMap<String, Hook>,
    ) -> BehaviorResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(BehaviorError::EmptyName);
        }
        Ok(Self {
            name,
            methods,
            lifecycle,
        })
    }

    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder {
            name: name.into(),
            methods: BTreeMap::new(),
            lifecycle: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lifecycle callback for `kind`, if one was registered.
    pub fn hook(&self, kind: HookKind) -> Option<&Hook> {
        self.lifecycle.get(kind.name())
    }

    pub fn has_hook(&self, kind: HookKind) -> bool {
        self.lifecycle.contains_key(kind.name())
    }

    /// `true` if either intersection hook is present — the condition for
    /// creating a per-instance intersection observer.
    pub fn wants_intersection(&self) -> bool {
        self.has_hook(HookKind::IntersectionIn) || self.has_hook(HookKind::IntersectionOut)
    }

    pub fn method(&self, name: &str) -> Option<&Hook> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// All lifecycle keys, including stored-but-never-invoked unknown ones.
    pub fn lifecycle_names(&self) -> impl Iterator<Item = &str> {
        self.lifecycle.keys().map(String::as_str)
    }

    /// Derive a new definition from this one: tables are merged key by
    /// key, overrides winning.  `self` is left untouched.
    pub fn extend(
        &self,
        new_name: impl Into<String>,
        method_overrides: BTreeMap<String, Hook>,
        lifecycle_overrides: BTreeMap<String, Hook>,
    ) -> BehaviorResult<Definition> {
        let mut methods = self.methods.clone();
        methods.extend(method_overrides);
        let mut lifecycle = self.lifecycle.clone();
        lifecycle.extend(lifecycle_overrides);
        Definition::new(new_name, methods, lifecycle)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("lifecycle", &self.lifecycle.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ── Free-function forms ───────────────────────────────────────────────────────

/// [`Definition::new`] under its markup-facing name.
pub fn define(
    name: impl Into<String>,
    methods: BTreeMap<String, Hook>,
    lifecycle: BTreeMap<String, Hook>,
) -> BehaviorResult<Definition> {
    Definition::new(name, methods, lifecycle)
}

/// [`Definition::extend`] as a free function.
pub fn extend(
    base: &Definition,
    new_name: impl Into<String>,
    method_overrides: BTreeMap<String, Hook>,
    lifecycle_overrides: BTreeMap<String, Hook>,
) -> BehaviorResult<Definition> {
    base.extend(new_name, method_overrides, lifecycle_overrides)
}

// ── DefinitionBuilder ─────────────────────────────────────────────────────────

/// Fluent construction for [`Definition`].
///
/// ```rust,ignore
/// let accordion = Definition::builder("accordion")
///     .method("toggle", |cx| { /* … */ Ok(()) })
///     .init(|cx| { /* … */ Ok(()) })
///     .destroy(|cx| { /* … */ Ok(()) })
///     .build()?;
/// ```
pub struct DefinitionBuilder {
    name: String,
    methods: BTreeMap<String, Hook>,
    lifecycle: BTreeMap<String, Hook>,
}

macro_rules! lifecycle_setter {
    ($(#[$doc:meta])* $fn_name:ident, $kind:expr) => {
        $(#[$doc])*
        pub fn $fn_name<F>(self, hook: F) -> Self
        where
            F: Fn(&mut BehaviorCx<'_>) -> BehaviorResult<()> + 'static,
        {
            self.hook($kind.name(), hook)
        }
    };
}

impl DefinitionBuilder {
    /// Add a named method, callable via `BehaviorCx::call`.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut BehaviorCx<'_>) -> BehaviorResult<()> + 'static,
    {
        self.methods.insert(name.into(), Rc::new(f));
        self
    }

    /// Register a lifecycle callback under an arbitrary key.
    ///
    /// Keys outside [`HookKind::ALL`] are stored but never invoked.
    pub fn hook<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut BehaviorCx<'_>) -> BehaviorResult<()> + 'static,
    {
        self.lifecycle.insert(name.into(), Rc::new(f));
        self
    }

    lifecycle_setter!(
        /// Runs once when the instance is initialized.
        init, HookKind::Init);
    lifecycle_setter!(
        /// Runs on every disabled → enabled transition.
        enabled, HookKind::Enabled);
    lifecycle_setter!(
        /// Runs on every enabled → disabled transition.
        disabled, HookKind::Disabled);
    lifecycle_setter!(
        /// Runs when the active breakpoint changes.
        media_query_updated, HookKind::MediaQueryUpdated);
    lifecycle_setter!(
        /// Runs when the element enters the viewport.
        intersection_in, HookKind::IntersectionIn);
    lifecycle_setter!(
        /// Runs when the element leaves the viewport.
        intersection_out, HookKind::IntersectionOut);
    lifecycle_setter!(
        /// Runs after a debounced viewport resize.
        resized, HookKind::Resized);
    lifecycle_setter!(
        /// Runs as the instance is torn down.
        destroy, HookKind::Destroy);

    pub fn build(self) -> BehaviorResult<Definition> {
        Definition::new(self.name, self.methods, self.lifecycle)
    }
}
