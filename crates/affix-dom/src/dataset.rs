//! Markup-name ↔ dataset-key case normalization.
//!
//! HTML data attributes are hyphenated lowercase in markup
//! (`data-behavior-lazy`) but exposed camelCased through the dataset API
//! (`behaviorLazy`).  Scans configured with either form must land on the
//! same attribute, so both directions live here and every attribute-name
//! construction in the framework goes through them.

/// Hyphenated markup suffix → camelCase dataset key.
///
/// `"behavior-lazy"` → `"behaviorLazy"`.  Input is lowercased first, so
/// `"Behavior-Lazy"` normalizes identically.
pub fn dataset_key(markup_suffix: &str) -> String {
    let lower = markup_suffix.to_ascii_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut upper_next = false;
    for ch in lower.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// camelCase dataset key → hyphenated markup suffix.
///
/// `"behaviorLazy"` → `"behavior-lazy"`.
pub fn markup_suffix(dataset_key: &str) -> String {
    let mut out = String::with_capacity(dataset_key.len() + 2);
    for ch in dataset_key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Full attribute name for a suffix given in either form.
///
/// `"behavior"` → `"data-behavior"`, `"fooLazymedia"` →
/// `"data-foo-lazymedia"`.
pub fn data_attr(suffix: &str) -> String {
    format!("data-{}", markup_suffix(&dataset_key(suffix)))
}
