//! Per-activation configuration.

use std::collections::BTreeMap;

use affix_core::BreakpointOrder;
use affix_dom::ElementId;

/// Options for the per-instance intersection observer.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionOptions {
    /// Margin around the viewport used when deciding intersection, in the
    /// host's own syntax.  The engine stores it for the host; it never
    /// interprets the value itself.
    pub root_margin: String,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            root_margin: "20%".to_string(),
        }
    }
}

/// Caller-supplied configuration for one behavior activation.
///
/// Everything is optional; `BehaviorConfig::default()` is what the scan
/// passes for declaratively activated behaviors.
#[derive(Clone, Debug, Default)]
pub struct BehaviorConfig {
    /// Seed options.  Declarative `data-<name>-<key>` attributes fold in
    /// under these — on a key collision the value here wins and the
    /// attribute is ignored with a warning.
    pub options: BTreeMap<String, String>,

    /// Intersection observer options for this instance.
    pub intersection: IntersectionOptions,

    /// Pre-resolved child overrides: exact name match here takes
    /// precedence over the declarative DOM lookup.
    pub children: BTreeMap<String, ElementId>,

    /// Breakpoint ordering override.  `None` falls back to the
    /// engine-wide order.
    pub breakpoints: Option<BreakpointOrder>,
}

impl BehaviorConfig {
    /// Convenience: a config carrying just one seed option.
    pub fn with_option(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.options.insert(key.into(), value.into());
        config
    }
}
