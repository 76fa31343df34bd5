//! Engine tests: scans, imports, mutation/intersection/breakpoint
//! reaction, and teardown bookkeeping.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use affix_behavior::{BehaviorError, Definition, ListenTarget, Trigger};
use affix_core::{FixedOracle, Millis};
use affix_dom::{Document, ElementId};

use crate::{Engine, EngineError, EngineOptions, ManualResolver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_engine(doc: Document, tier: &str) -> (Engine, Rc<FixedOracle>) {
    let oracle = Rc::new(FixedOracle::new(tier));
    let engine = Engine::builder(doc, Rc::clone(&oracle)).build().unwrap();
    (engine, oracle)
}

/// One connected element carrying the given attributes.
fn page_with(attrs: &[(&str, &str)]) -> (Document, ElementId) {
    let mut doc = Document::new();
    let el = doc.create_element("div");
    doc.append(doc.root(), el).unwrap();
    for (name, value) in attrs {
        doc.set_attribute(el, name, value).unwrap();
    }
    doc.take_mutations(); // setup is not part of any observed batch
    (doc, el)
}

fn counting_init(name: &str, counter: &Rc<Cell<usize>>) -> Definition {
    let counter = Rc::clone(counter);
    Definition::builder(name)
        .init(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .build()
        .unwrap()
}

/// Definition whose init/destroy hooks append `"<event>:<element>"` to a
/// shared log.
fn logging_def(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Definition {
    let init_log = Rc::clone(log);
    let destroy_log = Rc::clone(log);
    Definition::builder(name)
        .init(move |cx| {
            init_log.borrow_mut().push(format!("init:{}", cx.element()));
            Ok(())
        })
        .destroy(move |cx| {
            destroy_log.borrow_mut().push(format!("destroy:{}", cx.element()));
            Ok(())
        })
        .build()
        .unwrap()
}

// ── Scan + activation invariants ──────────────────────────────────────────────

#[cfg(test)]
mod activation {
    use super::*;

    #[test]
    fn scan_activates_each_marker_name() {
        let (doc, el) = page_with(&[("data-behavior", "menu tabs")]);
        let (mut engine, _) = build_engine(doc, "md");
        let menu_inits = Rc::new(Cell::new(0));
        let tab_inits = Rc::new(Cell::new(0));
        engine.add_behaviors([
            counting_init("menu", &menu_inits),
            counting_init("tabs", &tab_inits),
        ]);
        assert!(engine.is_active("menu", el));
        assert!(engine.is_active("tabs", el));
        assert_eq!(menu_inits.get(), 1);
        assert_eq!(tab_inits.get(), 1);
    }

    #[test]
    fn repeated_activation_is_idempotent() {
        let (doc, el) = page_with(&[("data-behavior", "menu")]);
        let (mut engine, _) = build_engine(doc, "md");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("menu", &inits)]);
        for _ in 0..5 {
            engine.activate("menu", el).unwrap();
        }
        assert_eq!(inits.get(), 1, "one live instance per (name, element)");
    }

    #[test]
    fn unknown_name_is_evicted_and_registrable_later() {
        let (doc, el) = page_with(&[("data-behavior", "menu ghost")]);
        let (mut engine, _) = build_engine(doc, "md");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("menu", &inits)]);

        assert!(engine.is_active("menu", el));
        assert!(!engine.is_active("ghost", el));
        assert!(engine.pending_imports().is_empty(), "failed import fully unwound");

        // Out-of-band registration succeeds and the rescan picks the
        // element back up.
        let ghost_inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("ghost", &ghost_inits)]);
        assert!(engine.is_active("ghost", el));
        assert_eq!(ghost_inits.get(), 1);
        assert_eq!(inits.get(), 1, "sibling behavior untouched by the rescan");
    }

    #[test]
    fn invalid_target_fails_the_call_without_registry_damage() {
        let (doc, _el) = page_with(&[]);
        let (mut engine, _) = build_engine(doc, "md");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("menu", &inits)]);

        let root = engine.dom().root();
        let err = engine.activate("menu", root).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Behavior(BehaviorError::InvalidTarget(_))
        ));
        assert!(!engine.is_active("menu", root));
    }

    #[test]
    fn failing_init_hook_does_not_abort_siblings() {
        let (doc, el) = page_with(&[("data-behavior", "broken menu")]);
        let (mut engine, _) = build_engine(doc, "md");
        let inits = Rc::new(Cell::new(0));
        let broken = Definition::builder("broken")
            .init(|_| Err(BehaviorError::Hook("boom".to_string())))
            .build()
            .unwrap();
        engine.add_behaviors([broken, counting_init("menu", &inits)]);
        assert!(engine.is_active("menu", el), "sibling still processed");
        assert_eq!(inits.get(), 1);
    }
}

// ── Lazy import ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod import {
    use super::*;

    #[test]
    fn pending_import_queues_and_flushes_in_arrival_order() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append(doc.root(), a).unwrap();
        doc.append(doc.root(), b).unwrap();
        doc.set_attribute(a, "data-behavior", "widget").unwrap();
        doc.set_attribute(b, "data-behavior", "widget").unwrap();
        doc.take_mutations();

        let oracle = Rc::new(FixedOracle::new("md"));
        let mut engine = Engine::builder(doc, Rc::clone(&oracle))
            .resolver(ManualResolver)
            .build()
            .unwrap();

        // Anything registered triggers the scan; 'widget' goes pending.
        engine.add_behaviors([Definition::builder("noop").build().unwrap()]);
        assert_eq!(engine.pending_imports(), vec!["widget"]);
        assert!(!engine.is_active("widget", a));

        let log = Rc::new(RefCell::new(Vec::new()));
        engine.finish_import("widget", Ok(logging_def("widget", &log)));
        assert!(engine.is_active("widget", a));
        assert!(engine.is_active("widget", b));
        assert_eq!(
            *log.borrow(),
            vec![format!("init:{a}"), format!("init:{b}")],
            "queued activations flush in arrival order"
        );
    }

    #[test]
    fn import_shape_mismatch_is_rolled_back() {
        let (doc, el) = page_with(&[("data-behavior", "widget")]);
        let oracle = Rc::new(FixedOracle::new("md"));
        let mut engine = Engine::builder(doc, oracle)
            .resolver(ManualResolver)
            .build()
            .unwrap();
        engine.add_behaviors([Definition::builder("noop").build().unwrap()]);

        let wrong = Definition::builder("somethingElse").build().unwrap();
        engine.finish_import("widget", Ok(wrong));
        assert!(!engine.is_registered("widget"));
        assert!(engine.pending_imports().is_empty());

        // The eviction leaves the door open for registration.
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("widget", &inits)]);
        assert!(engine.is_active("widget", el));
    }
}

// ── Mutation reaction ─────────────────────────────────────────────────────────

#[cfg(test)]
mod mutation_reaction {
    use super::*;

    /// body > wrap > (x, y), both carrying the behavior marker.
    fn two_instance_subtree() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let wrap = doc.create_element("section");
        let x = doc.create_element("div");
        let y = doc.create_element("div");
        doc.append(doc.root(), wrap).unwrap();
        doc.append(wrap, x).unwrap();
        doc.append(wrap, y).unwrap();
        doc.set_attribute(x, "data-behavior", "card").unwrap();
        doc.set_attribute(y, "data-behavior", "card").unwrap();
        doc.take_mutations();
        (doc, wrap, x, y)
    }

    #[test]
    fn subtree_removal_destroys_every_contained_instance_once() {
        let (doc, wrap, x, y) = two_instance_subtree();
        let (mut engine, _) = build_engine(doc, "md");
        let log = Rc::new(RefCell::new(Vec::new()));
        engine.add_behaviors([logging_def("card", &log)]);
        log.borrow_mut().clear();

        engine.dom_mut().detach(wrap).unwrap();
        engine.flush();

        assert_eq!(
            *log.borrow(),
            vec![format!("destroy:{x}"), format!("destroy:{y}")],
            "both instances destroyed exactly once, in document order"
        );
        assert!(!engine.is_active("card", x));
        assert!(!engine.is_active("card", y));
    }

    #[test]
    fn added_subtree_is_scanned() {
        let (doc, _el) = page_with(&[]);
        let (mut engine, _) = build_engine(doc, "md");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("card", &inits)]);
        assert_eq!(inits.get(), 0, "nothing marked yet");

        let doc = engine.dom_mut();
        let fresh = doc.create_element("div");
        doc.set_attribute(fresh, "data-behavior", "card").unwrap();
        let root = doc.root();
        doc.append(root, fresh).unwrap();
        engine.flush();

        assert!(engine.is_active("card", fresh));
        assert_eq!(inits.get(), 1);
    }

    #[test]
    fn removals_are_handled_before_additions_within_a_batch() {
        let (doc, wrap, x, y) = two_instance_subtree();
        let (mut engine, _) = build_engine(doc, "md");
        let log = Rc::new(RefCell::new(Vec::new()));
        engine.add_behaviors([logging_def("card", &log)]);
        log.borrow_mut().clear();

        // One batch: an addition journaled before a removal.
        let doc = engine.dom_mut();
        let fresh = doc.create_element("div");
        doc.set_attribute(fresh, "data-behavior", "card").unwrap();
        let root = doc.root();
        doc.append(root, fresh).unwrap();
        doc.detach(wrap).unwrap();
        engine.flush();

        assert_eq!(
            *log.borrow(),
            vec![
                format!("destroy:{x}"),
                format!("destroy:{y}"),
                format!("init:{fresh}"),
            ],
            "removal handling runs first even when journaled second"
        );
    }

    #[test]
    fn mutations_before_first_registration_are_discarded() {
        let (doc, _el) = page_with(&[]);
        let (mut engine, _) = build_engine(doc, "md");

        let doc = engine.dom_mut();
        let fresh = doc.create_element("div");
        doc.set_attribute(fresh, "data-behavior", "card").unwrap();
        let root = doc.root();
        doc.append(root, fresh).unwrap();
        engine.flush(); // nothing registered: batch dropped

        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("card", &inits)]);
        // The registration scan still finds the element in the document.
        assert_eq!(inits.get(), 1);
    }
}

// ── Breakpoint gating ─────────────────────────────────────────────────────────

#[cfg(test)]
mod media_gating {
    use super::*;

    fn gated_def(name: &str, enabled: &Rc<Cell<usize>>, disabled: &Rc<Cell<usize>>) -> Definition {
        let en = Rc::clone(enabled);
        let dis = Rc::clone(disabled);
        Definition::builder(name)
            .enabled(move |_| {
                en.set(en.get() + 1);
                Ok(())
            })
            .disabled(move |_| {
                dis.set(dis.get() + 1);
                Ok(())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn media_option_toggles_across_breakpoint_changes() {
        let (doc, el) = page_with(&[
            ("data-behavior", "nav"),
            ("data-nav-media", "md+"),
        ]);
        let (mut engine, oracle) = build_engine(doc, "sm");
        let enabled = Rc::new(Cell::new(0));
        let disabled = Rc::new(Cell::new(0));
        engine.add_behaviors([gated_def("nav", &enabled, &disabled)]);

        assert!(engine.is_active("nav", el));
        assert_eq!(enabled.get(), 0, "gate unmet at sm: stays disabled");

        oracle.set("md");
        engine.breakpoint_changed();
        assert_eq!(enabled.get(), 1);

        oracle.set("lg");
        engine.breakpoint_changed();
        assert_eq!(enabled.get(), 1, "md+ still satisfied: no re-fire");

        oracle.set("xs");
        engine.breakpoint_changed();
        assert_eq!(disabled.get(), 1);
    }

    #[test]
    fn media_query_hook_receives_old_and_new_tiers() {
        let (doc, _el) = page_with(&[("data-behavior", "watcher")]);
        let (mut engine, oracle) = build_engine(doc, "sm");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let watcher = Definition::builder("watcher")
            .media_query_updated(move |cx| {
                if let Trigger::MediaQuery(change) = cx.trigger() {
                    log.borrow_mut().push((change.from.clone(), change.to.clone()));
                }
                Ok(())
            })
            .build()
            .unwrap();
        engine.add_behaviors([watcher]);

        oracle.set("md");
        engine.breakpoint_changed();
        assert_eq!(*seen.borrow(), vec![(Some("sm".to_string()), "md".to_string())]);

        // Spurious notification with no tier change is swallowed.
        engine.breakpoint_changed();
        assert_eq!(seen.borrow().len(), 1);
    }
}

// ── Lazy activation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lazy_activation {
    use super::*;

    #[test]
    fn ungated_lazy_behavior_activates_on_first_intersection() {
        let (doc, el) = page_with(&[("data-behavior-lazy", "carousel")]);
        let (mut engine, _) = build_engine(doc, "md");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("carousel", &inits)]);

        assert_eq!(inits.get(), 0, "not yet intersecting");
        assert_eq!(engine.lazy_observed_count(), 1);

        engine.intersection_changed(&[(el, true)]);
        assert!(engine.is_active("carousel", el));
        assert_eq!(inits.get(), 1);
        assert_eq!(engine.lazy_observed_count(), 0, "observation stops when set empties");
    }

    #[test]
    fn gate_defers_activation_until_breakpoint_satisfies() {
        let (doc, el) = page_with(&[
            ("data-behavior-lazy", "carousel"),
            ("data-carousel-lazymedia", "md+"),
        ]);
        let (mut engine, oracle) = build_engine(doc, "sm");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("carousel", &inits)]);

        // Intersecting at sm: gate unmet, stays observed.
        engine.intersection_changed(&[(el, true)]);
        assert_eq!(inits.get(), 0);
        assert_eq!(engine.lazy_observed_count(), 1);

        // Breakpoint reaches md while still intersecting: activates once,
        // observation stops.
        oracle.set("md");
        engine.breakpoint_changed();
        assert!(engine.is_active("carousel", el));
        assert_eq!(inits.get(), 1);
        assert_eq!(engine.lazy_observed_count(), 0);
    }

    #[test]
    fn breakpoint_change_ignores_non_intersecting_elements() {
        let (doc, el) = page_with(&[
            ("data-behavior-lazy", "carousel"),
            ("data-carousel-lazymedia", "md+"),
        ]);
        let (mut engine, oracle) = build_engine(doc, "sm");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("carousel", &inits)]);

        oracle.set("md");
        engine.breakpoint_changed();
        assert_eq!(inits.get(), 0, "never intersected: still pending");
        assert_eq!(engine.lazy_observed_count(), 1);
    }

    #[test]
    fn leaving_the_viewport_only_clears_the_flag() {
        let (doc, el) = page_with(&[
            ("data-behavior-lazy", "carousel"),
            ("data-carousel-lazymedia", "md+"),
        ]);
        let (mut engine, oracle) = build_engine(doc, "sm");
        let inits = Rc::new(Cell::new(0));
        engine.add_behaviors([counting_init("carousel", &inits)]);

        engine.intersection_changed(&[(el, true)]);
        engine.intersection_changed(&[(el, false)]);
        oracle.set("md");
        engine.breakpoint_changed();
        assert_eq!(inits.get(), 0, "not intersecting at change time");

        engine.intersection_changed(&[(el, true)]);
        assert_eq!(inits.get(), 1, "re-entry picks it up");
    }

    #[test]
    fn removed_lazy_element_stops_being_observed() {
        let (doc, el) = page_with(&[("data-behavior-lazy", "carousel")]);
        let (mut engine, _) = build_engine(doc, "md");
        engine.add_behaviors([Definition::builder("carousel").build().unwrap()]);
        assert_eq!(engine.lazy_observed_count(), 1);

        engine.dom_mut().detach(el).unwrap();
        engine.flush();
        assert_eq!(engine.lazy_observed_count(), 0);
    }
}

// ── Intersection hooks ────────────────────────────────────────────────────────

#[cfg(test)]
mod intersection_hooks {
    use super::*;

    #[test]
    fn hooks_fire_on_transitions_only() {
        let (doc, el) = page_with(&[("data-behavior", "reveal")]);
        let (mut engine, _) = build_engine(doc, "md");
        let ins = Rc::new(Cell::new(0));
        let outs = Rc::new(Cell::new(0));
        let in_count = Rc::clone(&ins);
        let out_count = Rc::clone(&outs);
        let reveal = Definition::builder("reveal")
            .intersection_in(move |_| {
                in_count.set(in_count.get() + 1);
                Ok(())
            })
            .intersection_out(move |_| {
                out_count.set(out_count.get() + 1);
                Ok(())
            })
            .build()
            .unwrap();
        engine.add_behaviors([reveal]);

        engine.intersection_changed(&[(el, true)]);
        engine.intersection_changed(&[(el, true)]); // repeat: no transition
        engine.intersection_changed(&[(el, false)]);
        engine.intersection_changed(&[(el, false)]);
        engine.intersection_changed(&[(el, true)]);
        assert_eq!(ins.get(), 2);
        assert_eq!(outs.get(), 1);
    }
}

// ── Resize pipeline ───────────────────────────────────────────────────────────

#[cfg(test)]
mod resize {
    use super::*;

    #[test]
    fn bursts_coalesce_into_one_notification() {
        let (doc, _el) = page_with(&[("data-behavior", "grid")]);
        let (mut engine, _) = build_engine(doc, "md");
        let resizes = Rc::new(Cell::new(0));
        let count = Rc::clone(&resizes);
        let grid = Definition::builder("grid")
            .resized(move |_| {
                count.set(count.get() + 1);
                Ok(())
            })
            .build()
            .unwrap();
        engine.add_behaviors([grid]);

        engine.viewport_resized(Millis(0));
        engine.poll(Millis(100));
        engine.viewport_resized(Millis(200)); // burst continues, deadline moves
        engine.poll(Millis(300));
        assert_eq!(resizes.get(), 0, "still inside the quiet window");

        engine.poll(Millis(450));
        assert_eq!(resizes.get(), 1, "one notification per quiesced burst");

        engine.poll(Millis(600));
        assert_eq!(resizes.get(), 1, "debouncer disarmed until the next burst");
    }

    #[test]
    fn quiesced_resize_detects_breakpoint_changes() {
        let (doc, el) = page_with(&[
            ("data-behavior", "nav"),
            ("data-nav-media", "md+"),
        ]);
        let (mut engine, oracle) = build_engine(doc, "sm");
        engine.add_behaviors([Definition::builder("nav").build().unwrap()]);

        oracle.set("lg");
        engine.viewport_resized(Millis(0));
        engine.poll(Millis(300));
        assert!(
            engine.instance_enabled("nav", el),
            "resize pipeline noticed the tier change and opened the gate"
        );
    }
}

// ── Listeners and teardown ────────────────────────────────────────────────────

#[cfg(test)]
mod listeners {
    use super::*;

    fn clicker(clicks: &Rc<Cell<usize>>) -> Definition {
        let clicks = Rc::clone(clicks);
        Definition::builder("button")
            .init(move |cx| {
                let clicks = Rc::clone(&clicks);
                cx.on(ListenTarget::Own, "click", move |_| {
                    clicks.set(clicks.get() + 1);
                    Ok(())
                });
                Ok(())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn listener_delivery_and_cancellation_on_destroy() {
        let (doc, el) = page_with(&[("data-behavior", "button")]);
        let (mut engine, _) = build_engine(doc, "md");
        let clicks = Rc::new(Cell::new(0));
        engine.add_behaviors([clicker(&clicks)]);

        engine.dispatch_event(el, "click");
        engine.dispatch_event(el, "click");
        assert_eq!(clicks.get(), 2);

        engine.destroy("button", el);
        engine.dispatch_event(el, "click");
        assert_eq!(clicks.get(), 2, "cancelled token stops future delivery");
    }

    #[test]
    fn subtree_removal_cancels_listeners_too() {
        let (doc, el) = page_with(&[("data-behavior", "button")]);
        let (mut engine, _) = build_engine(doc, "md");
        let clicks = Rc::new(Cell::new(0));
        engine.add_behaviors([clicker(&clicks)]);

        engine.dom_mut().detach(el).unwrap();
        engine.flush();
        engine.dispatch_event(el, "click");
        assert_eq!(clicks.get(), 0);
    }
}

// ── Sub-behavior delegation ───────────────────────────────────────────────────

#[cfg(test)]
mod sub_behaviors {
    use super::*;

    #[test]
    fn hook_can_attach_a_behavior_to_a_managed_node() {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        let panel = doc.create_element("div");
        doc.append(doc.root(), host).unwrap();
        doc.append(host, panel).unwrap();
        doc.set_attribute(host, "data-behavior", "composite").unwrap();
        doc.set_attribute(panel, "data-composite-panel", "").unwrap();
        doc.take_mutations();

        let (mut engine, _) = build_engine(doc, "md");
        let composite = Definition::builder("composite")
            .init(|cx| {
                let Some(panel) = cx.get_child("panel") else {
                    return Err(BehaviorError::Hook("missing panel child".to_string()));
                };
                cx.add_sub_behavior("drawer", panel, Default::default());
                Ok(())
            })
            .build()
            .unwrap();
        let drawer_inits = Rc::new(Cell::new(0));
        engine.add_behaviors([composite, counting_init("drawer", &drawer_inits)]);

        assert!(engine.is_active("composite", host));
        assert!(engine.is_active("drawer", panel));
        assert_eq!(drawer_inits.get(), 1);
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_validation {
    use super::*;

    #[test]
    fn identical_markers_rejected() {
        let options = EngineOptions {
            data_attr: "behavior".to_string(),
            lazy_attr: "Behavior".to_string(), // normalizes to the same attribute
            ..EngineOptions::default()
        };
        let result = Engine::builder(Document::new(), FixedOracle::new("md"))
            .options(options)
            .build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn empty_marker_rejected() {
        let options = EngineOptions {
            data_attr: String::new(),
            ..EngineOptions::default()
        };
        assert!(Engine::builder(Document::new(), FixedOracle::new("md"))
            .options(options)
            .build()
            .is_err());
    }
}
