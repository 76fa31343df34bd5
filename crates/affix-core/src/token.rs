//! Cooperative cancellation.
//!
//! Each behavior instance owns exactly one [`CancellationToken`]; every
//! event subscription the instance creates carries a clone.  `destroy()`
//! cancels the token once, which synchronously prevents delivery of any
//! future event to those subscriptions — no per-listener bookkeeping
//! needed at teardown.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A clonable cancel-once flag shared between an owner and its
/// subscriptions.
///
/// Clones observe the same underlying flag.  Cancellation is one-way:
/// there is no reset.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag.  Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// `true` if `other` shares this token's flag.
    pub fn same_token(&self, other: &CancellationToken) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
