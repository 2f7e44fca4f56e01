//! Filesystem-safe slugs
//!
//! Job identifiers and output file names are derived from catalog ids and
//! language codes, so they must be stable across runs and safe on disk.

/// Lowercase a string and collapse runs of non-alphanumeric characters to
/// single hyphens. Empty or fully-stripped input yields `"asset"` so a slug
/// is always a usable file stem.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "asset".to_string()
    } else {
        slug
    }
}
