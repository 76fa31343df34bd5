//! The definition resolver seam.
//!
//! The original system lazy-loads behavior code through a module system.
//! Here the engine is decoupled from any particular loading mechanism: it
//! asks an injected resolver to start resolving a name, and the outcome is
//! either immediate (`Ready`/`Unavailable`) or deferred, in which case the
//! host completes the import later through [`Engine::finish_import`]
//! [crate::Engine::finish_import].  There is no cancellation for in-flight
//! imports; a completed import nobody needs anymore still populates the
//! registry (wasted but harmless work).

use std::collections::HashMap;

use affix_behavior::Definition;
use thiserror::Error;

/// How a resolver handled a request.
pub enum ResolveOutcome {
    /// The definition is available right now (synchronous resolvers,
    /// preloaded bundles).
    Ready(Definition),
    /// Resolution started; the host will call `Engine::finish_import`
    /// when it completes.
    Pending,
    /// Nothing can be loaded for this name.
    Unavailable,
}

/// Asynchronous, fallible definition loading behind a synchronous
/// request-start interface.
pub trait DefinitionResolver {
    /// Begin resolving `name`.
    ///
    /// The engine guards against duplicate in-flight requests; a resolver
    /// will see each name at most once until that import settles.
    fn request(&mut self, name: &str) -> ResolveOutcome;
}

/// Why an import failed.  Soft: the engine logs and evicts the name so a
/// later registration or retry is possible.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no module found for behavior '{0}'")]
    NotFound(String),

    #[error("module for '{0}' did not expose a behavior definition")]
    InvalidShape(String),

    #[error("import of '{name}' failed: {reason}")]
    Failed { name: String, reason: String },
}

// ── Stock resolvers ───────────────────────────────────────────────────────────

/// Resolves nothing.  The builder default: all behaviors must be
/// registered explicitly.
pub struct NullResolver;

impl DefinitionResolver for NullResolver {
    fn request(&mut self, _name: &str) -> ResolveOutcome {
        ResolveOutcome::Unavailable
    }
}

/// Resolves synchronously from an in-memory table.  The demo/test
/// equivalent of a preloaded behavior bundle.
#[derive(Default)]
pub struct MapResolver {
    modules: HashMap<String, Definition>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def` under its own name.
    pub fn insert(&mut self, def: Definition) {
        self.modules.insert(def.name().to_string(), def);
    }

    pub fn with(mut self, def: Definition) -> Self {
        self.insert(def);
        self
    }
}

impl DefinitionResolver for MapResolver {
    fn request(&mut self, name: &str) -> ResolveOutcome {
        match self.modules.get(name) {
            Some(def) => ResolveOutcome::Ready(def.clone()),
            None => ResolveOutcome::Unavailable,
        }
    }
}

/// Always answers `Pending`: every import stays outstanding until the
/// host calls `Engine::finish_import`.  Models a real async module
/// loader in tests.
pub struct ManualResolver;

impl DefinitionResolver for ManualResolver {
    fn request(&mut self, _name: &str) -> ResolveOutcome {
        ResolveOutcome::Pending
    }
}
