//! Development-mode introspection (`debug-tools` feature).
//!
//! Debugging hosts get read/poke access to the registry and to live
//! instances.  None of this is part of the stable contract; production
//! builds leave the feature off and the whole module disappears.

use affix_dom::ElementId;
use log::warn;

use affix_behavior::Trigger;

use crate::Engine;

impl Engine {
    /// Names of every behavior active on `element`, in table order.
    pub fn behaviors_on(&self, element: ElementId) -> Vec<String> {
        match self.active.get(&element) {
            Some(by_name) => by_name.keys().cloned().collect(),
            None => {
                warn!("no behaviors on {element}");
                Vec::new()
            }
        }
    }

    /// Every registered definition name, sorted.
    pub fn definition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Read one property of a live instance.
    ///
    /// `enabled` and `intersecting` report the state flags; any other key
    /// is looked up in the options map first, then the binds map.
    pub fn instance_prop(&self, name: &str, element: ElementId, prop: &str) -> Option<String> {
        let Some(instance) = self.active.get(&element).and_then(|m| m.get(name)) else {
            warn!("no behavior '{name}' instance on {element}");
            return None;
        };
        match prop {
            "enabled" => Some(instance.is_enabled().to_string()),
            "intersecting" => Some(instance.is_intersecting().to_string()),
            key => instance
                .option(key)
                .or_else(|| instance.bind(key))
                .map(str::to_string),
        }
    }

    /// Poke an option on a live instance.
    pub fn set_instance_option(&mut self, name: &str, element: ElementId, key: &str, value: &str) {
        match self.active.get_mut(&element).and_then(|m| m.get_mut(name)) {
            Some(instance) => instance.set_option(key, value),
            None => warn!("no behavior '{name}' instance on {element}"),
        }
    }

    /// Invoke a named method on a live instance.
    pub fn call_method(&mut self, name: &str, element: ElementId, method: &str) {
        let outcome =
            self.with_instance_cx(element, name, Trigger::Lifecycle, |cx| cx.call(method));
        match outcome {
            None => warn!("no behavior '{name}' instance on {element}"),
            Some(Err(e)) => warn!("behavior '{name}' method {method:?} on {element}: {e}"),
            Some(Ok(())) => {}
        }
    }
}
