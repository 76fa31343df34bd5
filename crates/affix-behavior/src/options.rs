//! Declarative option folding.

use affix_dom::Document;

use crate::instance::Instance;

/// Fold `data-<behavior>-<key>` attributes on the instance's element into
/// its options.
///
/// Caller-supplied configuration wins: a key that already exists is left
/// alone and the attribute is reported once.  Everything after the
/// behavior prefix is taken verbatim as the key, so `data-accordion-open`
/// yields the key `open` and `data-accordion-panel-height` yields
/// `panel-height`.
pub(crate) fn fold_data_options(doc: &Document, instance: &mut Instance) {
    let prefix = format!("data-{}-", instance.name().to_ascii_lowercase());
    for (attr_name, value) in doc.attributes(instance.element()) {
        let Some(key) = attr_name.strip_prefix(&prefix) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        if instance.option(key).is_some() {
            log::warn!(
                "ignoring {key:?} option, as it already exists on the {} behavior; please choose another name",
                instance.name()
            );
            continue;
        }
        instance.set_option(key, value);
    }
}
