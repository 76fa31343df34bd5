//! Declarative one-way binding: model → DOM, synchronous.
//!
//! Two marker attributes on descendants of the instance's element drive
//! the sync:
//!
//! - `data-<behavior>-bindel="key …"` — text content replaced with the
//!   stringified value whenever `key` is written;
//! - `data-<behavior>-bindattr="key:attr,key2:attr2"` — `attr` set to the
//!   value, except the literal target `class`, which swaps the previously
//!   bound class for the new one.

use affix_dom::{query, Document};

use crate::instance::Instance;
use crate::BehaviorResult;

/// Sync every matching descendant, then record `value` under `key`.
///
/// The previous bound value is read *before* the store so class targets
/// can remove what the last write added.
pub(crate) fn update_binds(
    doc: &mut Document,
    instance: &mut Instance,
    key: &str,
    value: &str,
) -> BehaviorResult<()> {
    let name_lc = instance.name().to_ascii_lowercase();
    let root = instance.element();

    let bindel_attr = format!("data-{name_lc}-bindel");
    for el in query::by_attr_token(doc, root, &bindel_attr, key) {
        doc.set_text_content(el, value)?;
    }

    let bindattr_attr = format!("data-{name_lc}-bindattr");
    let needle = format!("{key}:");
    for el in query::by_attr_contains(doc, root, &bindattr_attr, &needle) {
        let Some(pairs) = doc.attribute(el, &bindattr_attr).map(str::to_string) else {
            continue;
        };
        for pair in pairs.split(',') {
            let mut parts = pair.splitn(2, ':');
            let (Some(k), Some(attr)) = (parts.next(), parts.next()) else {
                continue;
            };
            let (k, attr) = (k.trim(), attr.trim());
            if k != key {
                continue;
            }
            if attr == "class" {
                let previous = instance.bind(key).map(str::to_string);
                if previous.as_deref() != Some(value) {
                    if let Some(prev) = previous {
                        doc.remove_class(el, &prev)?;
                    }
                }
                if !value.is_empty() {
                    doc.add_class(el, value)?;
                }
            } else {
                doc.set_attribute(el, attr, value)?;
            }
        }
    }

    instance.set_bind_value(key, value);
    Ok(())
}
