//! Descendant queries by attribute.
//!
//! Stand-ins for the attribute-selector `querySelectorAll` forms the
//! original markup contract uses: presence (`[data-x]`), token membership
//! (`[data-x~=v]`-ish), and substring (`[data-x*=v]`).  All of them visit
//! descendants only — the queried root is excluded, matching selector
//! semantics.

use crate::{Document, ElementId};

/// Descendant elements of `root` carrying attribute `attr`.
pub fn by_attr(doc: &Document, root: ElementId, attr: &str) -> Vec<ElementId> {
    collect(doc, root, |doc, el| doc.attribute(el, attr).is_some())
}

/// Descendant elements whose `attr` value, split on whitespace, contains
/// `token`.
pub fn by_attr_token(doc: &Document, root: ElementId, attr: &str, token: &str) -> Vec<ElementId> {
    collect(doc, root, |doc, el| {
        doc.attribute(el, attr)
            .is_some_and(|v| v.split_whitespace().any(|t| t == token))
    })
}

/// Descendant elements whose `attr` value contains `needle` as a
/// substring.
pub fn by_attr_contains(doc: &Document, root: ElementId, attr: &str, needle: &str) -> Vec<ElementId> {
    collect(doc, root, |doc, el| {
        doc.attribute(el, attr).is_some_and(|v| v.contains(needle))
    })
}

fn collect(
    doc: &Document,
    root: ElementId,
    pred: impl Fn(&Document, ElementId) -> bool,
) -> Vec<ElementId> {
    doc.subtree(root)
        .into_iter()
        .skip(1) // exclude the root itself
        .filter(|&el| doc.is_element(el) && pred(doc, el))
        .collect()
}
