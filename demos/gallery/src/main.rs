//! Gallery demo: an accordion behavior plus a breakpoint-gated lazy
//! carousel, driven entirely by synthetic host events.
//!
//! Run with `RUST_LOG=warn cargo run -p gallery` to see the engine's
//! diagnostics alongside the demo output.

use std::rc::Rc;

use anyhow::Result;

use affix_behavior::{Definition, ListenTarget};
use affix_core::{FixedOracle, Millis};
use affix_dom::{Document, ElementId};
use affix_engine::{Engine, MapResolver};

struct Page {
    doc: Document,
    accordion: ElementId,
    header: ElementId,
    carousel: ElementId,
}

/// ```html
/// <main>
///   <section data-behavior="accordion">
///     <button data-accordion-header>…</button>
///     <div data-accordion-panel data-accordion-bindattr="state:class,state:aria-expanded">
///       <span data-accordion-bindel="toggles"></span>
///     </div>
///   </section>
///   <div data-behavior-lazy="carousel" data-carousel-lazymedia="md+"></div>
/// </main>
/// ```
fn build_page() -> Page {
    let mut doc = Document::new();
    let main = doc.create_element("main");

    let accordion = doc.create_element("section");
    doc.set_attribute(accordion, "data-behavior", "accordion").unwrap();
    let header = doc.create_element("button");
    doc.set_attribute(header, "data-accordion-header", "").unwrap();
    let panel = doc.create_element("div");
    doc.set_attribute(panel, "data-accordion-panel", "").unwrap();
    doc.set_attribute(
        panel,
        "data-accordion-bindattr",
        "state:class,state:aria-expanded",
    )
    .unwrap();
    let count = doc.create_element("span");
    doc.set_attribute(count, "data-accordion-bindel", "toggles").unwrap();

    let carousel = doc.create_element("div");
    doc.set_attribute(carousel, "data-behavior-lazy", "carousel").unwrap();
    doc.set_attribute(carousel, "data-carousel-lazymedia", "md+").unwrap();

    let root = doc.root();
    doc.append(root, main).unwrap();
    doc.append(main, accordion).unwrap();
    doc.append(accordion, header).unwrap();
    doc.append(accordion, panel).unwrap();
    doc.append(panel, count).unwrap();
    doc.append(main, carousel).unwrap();

    Page {
        doc,
        accordion,
        header,
        carousel,
    }
}

/// Click the header to toggle; the panel's class and ARIA state plus a
/// toggle counter stay in sync declaratively.
fn accordion() -> Definition {
    Definition::builder("accordion")
        .method("toggle", |cx| {
            let open = cx.option("open").is_some_and(|v| v == "true");
            let toggles: u32 = cx.bind("toggles").and_then(|v| v.parse().ok()).unwrap_or(0);
            cx.set_option("open", if open { "false" } else { "true" });
            cx.set_bind("state", if open { "closed" } else { "open" })?;
            cx.set_bind("toggles", toggles + 1)
        })
        .init(|cx| {
            cx.set_option("open", "false");
            cx.set_bind("state", "closed")?;
            cx.set_bind("toggles", 0)?;
            cx.on(ListenTarget::Children("header".to_string()), "click", |cx| {
                cx.call("toggle")
            });
            Ok(())
        })
        .build()
        .expect("static definition")
}

/// Stands in for a lazily imported module.
fn carousel() -> Definition {
    Definition::builder("carousel")
        .init(|cx| {
            println!("  [carousel] initialized on {}", cx.element());
            Ok(())
        })
        .build()
        .expect("static definition")
}

fn main() -> Result<()> {
    env_logger::init();

    let page = build_page();
    let oracle = Rc::new(FixedOracle::new("sm"));
    let mut engine = Engine::builder(page.doc, Rc::clone(&oracle))
        .resolver(MapResolver::new().with(carousel()))
        .build()?;

    println!("registering behaviors and scanning at breakpoint 'sm'…");
    engine.add_behaviors([accordion()]);

    println!("clicking the accordion header twice…");
    engine.dispatch_event(page.header, "click");
    engine.dispatch_event(page.header, "click");

    println!("scrolling the carousel into view at 'sm' (gate is md+)…");
    engine.intersection_changed(&[(page.carousel, true)]);
    println!(
        "  carousel active: {} (waiting for its breakpoint)",
        engine.is_active("carousel", page.carousel)
    );

    println!("growing the viewport past 'md'…");
    oracle.set("md");
    engine.viewport_resized(Millis(0));
    engine.poll(Millis(300));
    println!(
        "  carousel active: {}",
        engine.is_active("carousel", page.carousel)
    );

    let summary = serde_json::json!({
        "breakpoint": engine.current_breakpoint(),
        "accordion_active": engine.is_active("accordion", page.accordion),
        "accordion_enabled": engine.instance_enabled("accordion", page.accordion),
        "carousel_active": engine.is_active("carousel", page.carousel),
        "toggle_count_text": engine.dom().text_content(page.accordion),
        "lazy_elements_observed": engine.lazy_observed_count(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
