//! The framework's time unit.
//!
//! The only timer in the system is the resize debouncer, so time is just a
//! monotonically increasing millisecond counter supplied by the host on
//! each call.  Using an integer newtype keeps deadline arithmetic exact
//! and the engine free of any wall-clock dependency (tests pass literals).

use std::fmt;

/// A monotonic host timestamp in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// The instant `n` milliseconds after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Millis {
        Millis(self.0 + n)
    }

    /// Milliseconds elapsed from `earlier` to `self` (saturating).
    #[inline]
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Millis {
    type Output = Millis;
    #[inline]
    fn add(self, rhs: u64) -> Millis {
        Millis(self.0 + rhs)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
