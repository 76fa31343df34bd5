//! `EventHub` — token-guarded listener and subscription bookkeeping.
//!
//! Nothing here invokes hooks; the hub only stores registrations and
//! answers snapshot queries.  Every entry carries a clone of its owning
//! instance's cancellation token: a destroyed instance's registrations
//! stop matching immediately and are physically removed by the lazy
//! sweep on the next query.

use std::rc::Rc;

use affix_behavior::Hook;
use affix_core::CancellationToken;
use affix_dom::ElementId;

/// One `cx.on(…)` registration.
pub(crate) struct Listener {
    /// The element events must hit to match.
    pub target: ElementId,
    pub event: String,
    pub handler: Hook,
    /// The instance the handler runs against.
    pub owner_element: ElementId,
    pub owner_behavior: String,
    pub token: CancellationToken,
}

/// One global-notification subscription (resized / breakpoint-changed).
pub(crate) struct Subscription {
    pub element: ElementId,
    pub behavior: String,
    pub token: CancellationToken,
}

#[derive(Default)]
pub(crate) struct EventHub {
    listeners: Vec<Listener>,
    resized: Vec<Subscription>,
    media: Vec<Subscription>,
}

impl EventHub {
    // ── Listeners ─────────────────────────────────────────────────────────

    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Remove listeners matching any of `targets` with this exact handler.
    pub fn remove_listeners(&mut self, targets: &[ElementId], event: &str, handler: &Hook) {
        self.listeners.retain(|l| {
            !(l.event == event && targets.contains(&l.target) && Rc::ptr_eq(&l.handler, handler))
        });
    }

    /// Live listeners for (target, event): owner identity plus handler.
    pub fn listeners_for(
        &mut self,
        target: ElementId,
        event: &str,
    ) -> Vec<(ElementId, String, Hook)> {
        self.sweep();
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.event == event)
            .map(|l| (l.owner_element, l.owner_behavior.clone(), Rc::clone(&l.handler)))
            .collect()
    }

    // ── Global subscriptions ──────────────────────────────────────────────

    pub fn subscribe_resized(&mut self, element: ElementId, behavior: &str, token: CancellationToken) {
        self.resized.push(Subscription {
            element,
            behavior: behavior.to_string(),
            token,
        });
    }

    pub fn subscribe_media(&mut self, element: ElementId, behavior: &str, token: CancellationToken) {
        self.media.push(Subscription {
            element,
            behavior: behavior.to_string(),
            token,
        });
    }

    pub fn resized_subscribers(&mut self) -> Vec<(ElementId, String)> {
        self.sweep();
        self.resized
            .iter()
            .map(|s| (s.element, s.behavior.clone()))
            .collect()
    }

    pub fn media_subscribers(&mut self) -> Vec<(ElementId, String)> {
        self.sweep();
        self.media
            .iter()
            .map(|s| (s.element, s.behavior.clone()))
            .collect()
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Physically drop entries whose owner token was cancelled.
    pub fn sweep(&mut self) {
        self.listeners.retain(|l| !l.token.is_cancelled());
        self.resized.retain(|s| !s.token.is_cancelled());
        self.media.retain(|s| !s.token.is_cancelled());
    }
}
