//! Named responsive breakpoints and gate matching.
//!
//! # Design
//!
//! A breakpoint is a named viewport tier.  An application declares its
//! tiers once, smallest to largest, as a [`BreakpointOrder`]; everything
//! else works by index comparison within that order.  A gate string such
//! as `"md+"` means "the `md` tier or any larger one"; `"md-"` means `md`
//! or smaller; a bare `"md"` matches exactly.
//!
//! Matching never panics on bad input: an unrecognized queried name is
//! reported once through `log::warn!` and treated as a non-match, so a
//! typo in markup degrades to "behavior stays disabled" rather than a
//! crash.

use std::fmt;

use crate::{CoreError, CoreResult};

/// The default tier names, smallest to largest.
pub const DEFAULT_BREAKPOINTS: [&str; 6] = ["xs", "sm", "md", "lg", "xl", "xxl"];

// ── Modifier ─────────────────────────────────────────────────────────────────

/// Trailing gate modifier: `+` widens the match upward, `-` downward.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modifier {
    /// `name+` — the named tier or any larger one.
    OrLarger,
    /// `name-` — the named tier or any smaller one.
    OrSmaller,
}

// ── BreakpointQuery ───────────────────────────────────────────────────────────

/// A parsed gate string: a tier name plus an optional trailing modifier.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakpointQuery {
    pub name: String,
    pub modifier: Option<Modifier>,
}

impl BreakpointQuery {
    /// Split a raw gate string into name and modifier.
    ///
    /// Only a modifier at the very end of the string is recognized;
    /// `"md+x"` parses as the (unknown) name `md+x`.
    pub fn parse(raw: &str) -> Self {
        let (name, modifier) = match raw.as_bytes().last() {
            Some(b'+') => (&raw[..raw.len() - 1], Some(Modifier::OrLarger)),
            Some(b'-') => (&raw[..raw.len() - 1], Some(Modifier::OrSmaller)),
            _ => (raw, None),
        };
        Self {
            name: name.to_string(),
            modifier,
        }
    }
}

impl fmt::Display for BreakpointQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Some(Modifier::OrLarger) => write!(f, "{}+", self.name),
            Some(Modifier::OrSmaller) => write!(f, "{}-", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// ── BreakpointOrder ───────────────────────────────────────────────────────────

/// An application's breakpoint tiers, smallest to largest.
///
/// Cheap to clone; instances hold their own copy so a per-behavior
/// override never observes later engine-wide changes.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakpointOrder(Vec<String>);

impl Default for BreakpointOrder {
    fn default() -> Self {
        Self(DEFAULT_BREAKPOINTS.iter().map(|s| s.to_string()).collect())
    }
}

impl BreakpointOrder {
    /// Build an order from explicit tier names, smallest to largest.
    pub fn new<I, S>(names: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CoreError::EmptyBreakpointOrder);
        }
        Ok(Self(names))
    }

    /// The tier names in order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Position of `name` in the order, or `None` if unrecognized.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Does the gate `query` hold while `current` is the active tier?
    ///
    /// - empty query → warn, `false`
    /// - unrecognized queried name → warn, `false`
    /// - unrecognized `current` tier → `false` (the oracle is reporting a
    ///   tier this order doesn't know; nothing can match it)
    pub fn satisfies(&self, query: &str, current: &str) -> bool {
        if query.is_empty() {
            log::warn!("empty breakpoint query");
            return false;
        }
        let parsed = BreakpointQuery::parse(query);
        let Some(query_idx) = self.index_of(&parsed.name) else {
            log::warn!(
                "unrecognized breakpoint {:?}; supported breakpoints are: {}",
                parsed.name,
                self.0.join(", ")
            );
            return false;
        };
        let Some(current_idx) = self.index_of(current) else {
            return false;
        };
        match parsed.modifier {
            Some(Modifier::OrLarger) => current_idx >= query_idx,
            Some(Modifier::OrSmaller) => current_idx <= query_idx,
            None => current_idx == query_idx,
        }
    }
}
