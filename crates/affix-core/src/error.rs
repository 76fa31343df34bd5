//! Framework error base.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` impls or wrap it as one variant.  Soft failures
//! (unknown breakpoint names, option collisions) are not errors at all —
//! they are logged through the `log` facade and recovered locally.

use thiserror::Error;

/// The top-level error type for `affix-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("breakpoint order must contain at least one name")]
    EmptyBreakpointOrder,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `affix-core`.
pub type CoreResult<T> = Result<T, CoreError>;
