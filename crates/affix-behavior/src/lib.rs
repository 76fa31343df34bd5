//! `affix-behavior` — behavior definitions, instances, and the hook
//! context.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`definition`] | `Definition`, `define`/`extend`, `DefinitionBuilder`, `HookKind` |
//! | [`config`]     | `BehaviorConfig`, `IntersectionOptions`                       |
//! | [`instance`]   | `Instance` — per-(behavior, element) state machine            |
//! | [`context`]    | `BehaviorCx<'a>` — the view hooks run against, `EngineOp`     |
//! | [`binds`]      | declarative one-way text/attribute/class sync                 |
//! | [`options`]    | `data-<name>-<key>` option folding                            |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! Hooks never touch the registry directly.  A hook runs against a
//! [`BehaviorCx`] that exposes the instance's own state and the document;
//! anything registry-shaped — attaching a sub-behavior, registering an
//! event listener — is pushed onto the context's op queue as an
//! [`EngineOp`] and applied by the engine after the hook returns.  This
//! split keeps hook dispatch free of re-entrant registry borrows.

pub mod binds;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod instance;
pub mod options;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BehaviorConfig, IntersectionOptions};
pub use context::{BehaviorCx, EngineOp, ListenTarget, Trigger};
pub use definition::{define, extend, Definition, DefinitionBuilder, Hook, HookKind};
pub use error::{BehaviorError, BehaviorResult};
pub use instance::Instance;
