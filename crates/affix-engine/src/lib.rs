//! `affix-engine` — the behavior registry and lifecycle engine.
//!
//! # What the engine does
//!
//! ```text
//! add_behaviors(defs)
//!   ① register   — store definitions, install mutation observing (once)
//!   ② scan       — document-wide marker pass:
//!                    data-behavior="a b"        → activate eagerly
//!                    data-behavior-lazy="c"     → record + observe for
//!                                                 intersection (optional
//!                                                 data-c-lazymedia gate)
//! host events, any order:
//!   flush()                    — drain the DOM journal; removals destroy
//!                                contained instances first, additions re-scan
//!   intersection_changed(…)    — lazy activation + per-instance in/out hooks
//!   breakpoint_changed()       — lazy gate re-eval, then instance hooks/gates
//!   viewport_resized(now)/poll(now) — debounced resized notifications
//!   dispatch_event(el, ev)     — deliver to `cx.on(…)` listeners
//!   finish_import(name, res)   — complete a pending lazy import
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`engine`]   | `Engine`, `EngineOptions` — state + reaction paths     |
//! | [`builder`]  | `EngineBuilder`                                        |
//! | [`scan`]     | the declarative marker scan                            |
//! | [`resolver`] | `DefinitionResolver` seam + stock resolvers            |
//! | [`lazy`]     | `LazyTracker` — deferred activations per element       |
//! | [`events`]   | `EventHub` — token-guarded listeners + subscriptions   |
//! | [`debounce`] | `ResizeDebouncer`                                      |
//! | [`debug`]    | dev introspection (`debug-tools` feature)              |
//! | [`error`]    | `EngineError`, `EngineResult<T>`                       |
//!
//! # Cargo features
//!
//! | Feature       | Effect                                               |
//! |---------------|------------------------------------------------------|
//! | `debug-tools` | Instance/property introspection for debugging hosts. |
//! | `serde`       | Serde derives on public configuration types.         |

pub mod builder;
pub mod debounce;
#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod engine;
pub mod error;
pub mod events;
pub mod lazy;
pub mod resolver;
pub mod scan;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::EngineBuilder;
pub use engine::{Engine, EngineOptions};
pub use error::{EngineError, EngineResult};
pub use resolver::{
    DefinitionResolver, ImportError, ManualResolver, MapResolver, NullResolver, ResolveOutcome,
};
