//! `affix-dom` — the element tree the behavior engine runs against.
//!
//! A deliberately small, headless stand-in for the parts of a browser DOM
//! the framework needs: an arena tree of element/text nodes with string
//! attributes, descendant queries by attribute, class-list helpers, and a
//! structural mutation journal standing in for `MutationObserver`
//! batching.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`tree`]     | `Document`, `ElementId`, structure and traversal        |
//! | [`node`]     | `NodeData`, `NodeKind`, attribute + class storage       |
//! | [`dataset`]  | markup-name ↔ dataset-key case normalization            |
//! | [`query`]    | descendant queries by attribute presence/token/substring|
//! | [`mutation`] | `Mutation` — the journal record type                    |
//! | [`error`]    | `DomError`, `DomResult`                                 |
//!
//! # Journal semantics
//!
//! Structural changes to *connected* nodes (append under a connected
//! parent, detach of a connected subtree) push one record each onto the
//! journal.  The engine drains the journal in batches and processes all
//! removals before all additions, exactly as it would react to one
//! `MutationObserver` callback.  Detached subtrees stay alive in the
//! arena, so removal handlers can still walk them.

pub mod dataset;
pub mod error;
pub mod mutation;
pub mod node;
pub mod query;
pub mod tree;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DomError, DomResult};
pub use mutation::Mutation;
pub use node::{NodeData, NodeKind};
pub use tree::{Document, ElementId};
