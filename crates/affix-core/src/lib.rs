//! `affix-core` — foundational types for the `affix` behavior framework.
//!
//! This crate is a dependency of every other `affix-*` crate.  It
//! intentionally has no `affix-*` dependencies and minimal external ones
//! (only `log` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`breakpoint`] | `BreakpointOrder`, `BreakpointQuery`, gate matching   |
//! | [`oracle`]     | `BreakpointOracle` trait, `FixedOracle`               |
//! | [`token`]      | `CancellationToken`                                   |
//! | [`time`]       | `Millis` — the debounce clock's time unit             |
//! | [`error`]      | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |
//!
//! # Threading
//!
//! Everything here is single-threaded by design: the framework models the
//! one cooperative event queue of a UI host, so `CancellationToken` is
//! `Rc`-based and none of these types are `Send`.

pub mod breakpoint;
pub mod error;
pub mod oracle;
pub mod time;
pub mod token;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use breakpoint::{BreakpointOrder, BreakpointQuery, Modifier, DEFAULT_BREAKPOINTS};
pub use error::{CoreError, CoreResult};
pub use oracle::{BreakpointOracle, FixedOracle, MediaQueryChange};
pub use time::Millis;
pub use token::CancellationToken;
