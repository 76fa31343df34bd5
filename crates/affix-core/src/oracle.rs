//! The breakpoint oracle seam.
//!
//! Detecting the active breakpoint is a host concern (in a browser it is a
//! CSS media-query lookup; in tests it is a fixture).  The framework only
//! ever asks "what is the current tier?" through this trait and receives
//! change notifications through the engine's entry points.

use std::cell::RefCell;

/// Synchronous "what is the current breakpoint?" query.
///
/// Implementations must be cheap to call — the engine queries the oracle
/// on every gate evaluation rather than caching per-instance.
pub trait BreakpointOracle {
    /// Name of the currently active tier (e.g. `"md"`).
    fn current(&self) -> String;
}

/// A breakpoint-change notification: the previous tier (if one was ever
/// known) and the new one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MediaQueryChange {
    pub from: Option<String>,
    pub to: String,
}

// ── FixedOracle ───────────────────────────────────────────────────────────────

/// An oracle whose tier is set programmatically.
///
/// The standard impl for tests and headless hosts: set the tier, then tell
/// the engine something changed.
///
/// ```rust
/// use affix_core::{BreakpointOracle, FixedOracle};
///
/// let oracle = FixedOracle::new("sm");
/// assert_eq!(oracle.current(), "sm");
/// oracle.set("md");
/// assert_eq!(oracle.current(), "md");
/// ```
#[derive(Debug)]
pub struct FixedOracle {
    current: RefCell<String>,
}

impl FixedOracle {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: RefCell::new(initial.into()),
        }
    }

    /// Change the reported tier.  Takes `&self` so hosts can keep a shared
    /// handle next to the engine that owns the boxed oracle.
    pub fn set(&self, name: impl Into<String>) {
        *self.current.borrow_mut() = name.into();
    }
}

impl BreakpointOracle for FixedOracle {
    fn current(&self) -> String {
        self.current.borrow().clone()
    }
}

impl<T: BreakpointOracle + ?Sized> BreakpointOracle for std::rc::Rc<T> {
    fn current(&self) -> String {
        (**self).current()
    }
}
