//! Fluent builder for constructing an [`Engine`].

use affix_core::{BreakpointOracle, BreakpointOrder};
use affix_dom::{dataset, Document};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::debounce::ResizeDebouncer;
use crate::events::EventHub;
use crate::lazy::LazyTracker;
use crate::resolver::{DefinitionResolver, NullResolver};
use crate::{Engine, EngineError, EngineOptions, EngineResult};

/// Fluent builder for [`Engine`].
///
/// # Required inputs
///
/// - [`Document`] — the element tree the engine owns
/// - a [`BreakpointOracle`] — the host's "current tier" query
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                       |
/// |------------------|-----------------------------------------------|
/// | `.resolver(r)`   | [`NullResolver`] (no lazy imports)            |
/// | `.options(o)`    | `behavior` / `behavior-lazy` markers, 250 ms  |
/// | `.breakpoints(b)`| `[xs, sm, md, lg, xl, xxl]`                   |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = Engine::builder(doc, FixedOracle::new("md"))
///     .resolver(MapResolver::new().with(carousel))
///     .build()?;
/// engine.add_behaviors([accordion, menu]);
/// ```
pub struct EngineBuilder {
    dom: Document,
    oracle: Box<dyn BreakpointOracle>,
    resolver: Box<dyn DefinitionResolver>,
    options: EngineOptions,
    breakpoints: BreakpointOrder,
}

impl EngineBuilder {
    pub fn new(dom: Document, oracle: impl BreakpointOracle + 'static) -> Self {
        Self {
            dom,
            oracle: Box::new(oracle),
            resolver: Box::new(NullResolver),
            options: EngineOptions::default(),
            breakpoints: BreakpointOrder::default(),
        }
    }

    /// Supply the lazy-import resolver.
    pub fn resolver(mut self, resolver: impl DefinitionResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the engine-wide breakpoint ordering (instances without
    /// their own override fall back to this).
    pub fn breakpoints(mut self, breakpoints: BreakpointOrder) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Validate options and return a ready engine.
    ///
    /// No scan runs yet — the first `add_behaviors` call does that.
    pub fn build(self) -> EngineResult<Engine> {
        if self.options.data_attr.is_empty() {
            return Err(EngineError::Config(
                "eager marker attribute must be non-empty".to_string(),
            ));
        }
        if self.options.lazy_attr.is_empty() {
            return Err(EngineError::Config(
                "lazy marker attribute must be non-empty".to_string(),
            ));
        }
        if dataset::data_attr(&self.options.data_attr) == dataset::data_attr(&self.options.lazy_attr)
        {
            return Err(EngineError::Config(
                "eager and lazy marker attributes must differ".to_string(),
            ));
        }

        let current_breakpoint = self.oracle.current();
        let resize_debounce_ms = self.options.resize_debounce_ms;
        Ok(Engine {
            options: self.options,
            dom: self.dom,
            oracle: self.oracle,
            resolver: self.resolver,
            breakpoints: self.breakpoints,
            definitions: FxHashMap::default(),
            known_names: FxHashSet::default(),
            active: FxHashMap::default(),
            pending: FxHashMap::default(),
            lazy: LazyTracker::default(),
            io_watch: FxHashMap::default(),
            hub: EventHub::default(),
            debounce: ResizeDebouncer::new(resize_debounce_ms),
            current_breakpoint,
            observing: false,
        })
    }
}
